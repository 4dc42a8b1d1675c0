pub mod enrollment;
pub mod offer;
pub mod participant;
