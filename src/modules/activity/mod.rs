pub mod controller;
pub mod logger;
pub mod model;
pub mod router;
pub mod service;
