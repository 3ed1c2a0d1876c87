pub mod supervisor;
pub mod discovery;
pub mod delivery;
