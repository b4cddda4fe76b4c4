pub mod gene;
