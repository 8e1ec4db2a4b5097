//! Exit codes of the `embargo` binary.
//! Library errors map onto these through `EmbargoError::exit_code`.

pub const SUCCESS: i32 = 0;
pub const RUN_FAILED: i32 = 1; // One or more archives/objects failed
pub const CONFIG_ERROR: i32 = 2; // Bad config file, flag, cutoff, or store URL
pub const ACCESS_DENIED: i32 = 3;
pub const UNAVAILABLE: i32 = 4; // Store or whitelist could not be reached

#[cfg(test)]
mod tests {
    use super::*;
    use embargo_core::{EmbargoError, StoreError, WhitelistError};

    #[test]
    fn test_library_errors_map_to_contract() {
        let whitelist = EmbargoError::Whitelist(WhitelistError::Unavailable {
            location: "scraper/whitelist".into(),
            reason: "object not found".into(),
        });
        assert_eq!(whitelist.exit_code(), UNAVAILABLE);

        let denied = EmbargoError::FetchFailure {
            name: "a.tgz".into(),
            source: StoreError::AccessDenied {
                message: "403".into(),
            },
        };
        assert_eq!(denied.exit_code(), ACCESS_DENIED);

        let missing = EmbargoError::FetchFailure {
            name: "a.tgz".into(),
            source: StoreError::NotFound {
                name: "a.tgz".into(),
            },
        };
        assert_eq!(missing.exit_code(), RUN_FAILED);
    }
}
