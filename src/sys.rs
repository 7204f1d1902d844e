// SPDX-License-Identifier: MIT OR Apache-2.0

//! Platform-specific process identity.
//!
//! Every record carries the id of the writing process and of its parent, so a
//! reader can tell apart lines written by different processes sharing the file.

/// Id of the current process.
pub fn pid() -> u32 {
    std::process::id()
}

/// Id of the parent process. Zero where the platform has no such notion.
#[cfg(unix)]
pub fn ppid() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
pub fn ppid() -> u32 {
    0
}

#[cfg(test)]
mod tests {
    #[test]
    fn pid_matches_std() {
        assert_eq!(super::pid(), std::process::id());
    }

    #[cfg(unix)]
    #[test]
    fn parent_is_not_self() {
        assert_ne!(super::ppid(), super::pid());
    }
}
