pub mod documents;
pub mod enrollment;
