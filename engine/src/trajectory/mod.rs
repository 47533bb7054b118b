pub mod deluge;
pub mod ils;
pub mod rrt;
pub mod sa;
