//! Token gateway payload types.

use alloy::sol;
use serde::{Deserialize, Serialize};

sol! {
    /// Token metadata carried with the first leg of a transfer.
    ///
    /// Encoded as `abi.encode(symbol, name, decimals)`.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct TokenMetadata {
        string symbol;
        string name;
        uint8 decimals;
    }

    /// Calls gateways make into their counterpart through the bridge.
    #[derive(Debug, PartialEq, Eq)]
    interface IERC20Gateway {
        /// Mints the pegged representation of `originToken` to `to`, deploying it first if needed.
        function receivePeggedTokens(
            address originToken,
            address peggedToken,
            address from,
            address to,
            uint256 amount,
            bytes tokenMetadata
        ) external payable;

        /// Releases `amount` of a locked native `token` to `to`.
        function receiveNativeTokens(
            address token,
            address from,
            address to,
            uint256 amount
        ) external payable;
    }
}
