pub mod address_or_contract_name;
pub mod artifact_store;
pub mod function_selector;
