use alloy::sol;

sol! {
    #[sol(rpc)]
    contract Roles2Library {
        constructor(address _store, bytes32 _crate);

        function setRootUser(address _user, bool _enabled) external returns (uint);
        function isUserRoot(address _user) public view returns (bool);
        function addUserRole(address _user, uint8 _role) external returns (uint);
        function removeUserRole(address _user, uint8 _role) external returns (uint);
        function hasUserRole(address _user, uint8 _role) public view returns (bool);
        function setPublicCapability(address _code, bytes4 _sig, bool _enabled) external returns (uint);
        function isCapabilityPublic(address _code, bytes4 _sig) public view returns (bool);
        function addRoleCapability(uint8 _role, address _code, bytes4 _sig) external returns (uint);
        function removeRoleCapability(uint8 _role, address _code, bytes4 _sig) external returns (uint);
        function getCapabilityRoles(address _code, bytes4 _sig) public view returns (bytes32);
        function setupEventsHistory(address _eventsHistory) external returns (uint);
        function getEventsHistory() public view returns (address);
    }
}
