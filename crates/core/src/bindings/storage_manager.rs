use alloy::sol;

sol! {
    #[sol(rpc)]
    contract StorageManager {
        function giveAccess(address _actor, bytes32 _role) external returns (uint);
        function blockAccess(address _actor, bytes32 _role) external returns (uint);
        function isAllowed(address _actor, bytes32 _role) public view returns (bool);
    }
}
