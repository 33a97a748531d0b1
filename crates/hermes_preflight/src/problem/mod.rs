pub mod point;
pub mod relation;
pub mod service;
pub mod time_window;
pub mod travel_matrix;
pub mod vehicle;
pub mod vehicle_routing_problem;
