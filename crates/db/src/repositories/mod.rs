//! Query layer, one repository per table.

mod sensor_repo;

pub use sensor_repo::SensorRepo;
