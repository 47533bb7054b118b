pub mod local_search;
pub mod refine;
