use ethers::contract::abigen;

// Generate type-safe contract bindings
abigen!(
    RewardsCoordinator,
    r#"[
        struct DistributionRoot { bytes32 root; uint32 rewardsCalculationEndTimestamp; uint32 activatedAt; bool disabled; }
        function currRewardsCalculationEndTimestamp() external view returns (uint32)
        function getDistributionRootsLength() external view returns (uint256)
        function getCurrentClaimableDistributionRoot() external view returns (DistributionRoot memory)
        function getRootIndexFromHash(bytes32 rootHash) external view returns (uint32)
        function cumulativeClaimed(address earner, address token) external view returns (uint256)
    ]"#,
);

abigen!(
    ERC20,
    r#"[
        function name() external view returns (string)
    ]"#,
);
