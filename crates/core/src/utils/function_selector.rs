use crate::errors::MigrationError;
use alloy::primitives::{B256, FixedBytes, aliases::B32, keccak256};
use eyre::Result;

/// First 4 bytes of `keccak256` over a canonical declaration such as
/// `setRoles2Library(address)`.
pub fn function_selector(function_signature: &str) -> B32 {
    FixedBytes::<4>::from_slice(&keccak256(function_signature.as_bytes())[..4])
}

/// Right-pads a short string into a `bytes32`, the way storage labels and
/// crate names are passed to the storage contracts.
pub fn label_to_bytes32(label: &str) -> Result<B256> {
    let bytes = label.as_bytes();
    if bytes.len() > 32 {
        return Err(MigrationError::LabelTooLong(label.to_string()).into());
    }
    let mut word = [0u8; 32];
    word[..bytes.len()].copy_from_slice(bytes);
    Ok(B256::from(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::roles2_library_adapter::Roles2LibraryAdapter;
    use alloy::primitives::Address;
    use alloy::sol_types::SolCall;

    fn selector_from_calldata(calldata: &[u8]) -> Option<B32> {
        calldata.get(..4).map(FixedBytes::<4>::from_slice)
    }

    #[test]
    fn test_selector_matches_placeholder_call() {
        let calldata =
            Roles2LibraryAdapter::setRoles2LibraryCall::new((Address::ZERO,)).abi_encode();
        let from_call = selector_from_calldata(&calldata).unwrap();
        let from_signature = function_selector("setRoles2Library(address)");

        assert_eq!(from_call, from_signature);
        assert_eq!(
            from_signature,
            B32::from(Roles2LibraryAdapter::setRoles2LibraryCall::SELECTOR)
        );
    }

    #[test]
    fn test_known_selector() {
        // transfer(address,uint256)
        assert_eq!(
            function_selector("transfer(address,uint256)").to_string(),
            "0xa9059cbb"
        );
    }

    #[test]
    fn test_label_padding() {
        let label = label_to_bytes32("Roles2Library").unwrap();
        assert_eq!(&label[..13], b"Roles2Library");
        assert!(label[13..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_label_too_long() {
        let err = label_to_bytes32(&"x".repeat(33)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MigrationError>(),
            Some(MigrationError::LabelTooLong(_))
        ));
    }

    #[test]
    fn test_short_calldata() {
        assert!(selector_from_calldata(&[0x01, 0x02]).is_none());
    }
}
