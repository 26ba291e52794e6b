pub mod chain;
#[cfg(test)]
pub mod memory_chain;
pub mod rpc_chain;
