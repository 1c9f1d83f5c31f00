pub mod abi;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coordinator; // Rewards coordinator reads
pub mod error;
pub mod output;
pub mod proofs; // Claim amounts from the proof store
pub mod rewards;
pub mod show;
pub mod tokens;
pub mod utils;
