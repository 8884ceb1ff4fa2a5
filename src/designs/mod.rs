pub mod journal;
pub mod labs;
