use alloy::sol;

sol! {
    #[sol(rpc)]
    contract Roles2LibraryAdapter {
        constructor(address _roles2Library);

        function roles2Library() external view returns (address);
        function setRoles2Library(address _roles2Library) external returns (uint);
        function setupEventsHistory(address _eventsHistory) external returns (uint);
        function getEventsHistory() public view returns (address);
    }
}
