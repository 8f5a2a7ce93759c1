pub mod corpus;
pub mod engine;
pub mod params;
pub mod snapshot;
pub mod table;
pub mod text;
pub mod types;
pub mod vocabulary;
