use crate::{
    error::{ApplyError, ListError},
    id::BootId,
    invoke::Invoker,
    order::BootOrder,
    parse::{parse_entries, BootInfo},
};

/// The interface presentation layers work against.
///
/// Each operation is one fresh, blocking invocation of the firmware utility;
/// nothing is cached and no state is kept between calls, so two identical
/// `apply_order` calls are two independent commits.
pub struct BootManager<I> {
    invoker: I,
}

impl<I: Invoker> BootManager<I> {
    pub fn new(invoker: I) -> Self {
        BootManager { invoker }
    }

    /// Enumerates the firmware's boot entries.
    pub fn list_entries(&self) -> Result<BootInfo, ListError> {
        let raw = self.invoker.invoke(&[])?;
        Ok(parse_entries(&raw)?)
    }

    /// Validates `order` and commits it as the new boot order, replacing the
    /// stored order as a whole.
    ///
    /// Every identifier is validated before any external command runs; the
    /// first malformed one fails the call with its position and value and
    /// zero invocations. Duplicates are not rejected here: the utility owns
    /// referential integrity against its entry table and its rejection
    /// surfaces as [`ApplyError::Commit`].
    pub fn apply_order<S: AsRef<str>>(&self, order: &[S]) -> Result<(), ApplyError> {
        let mut ids = BootOrder::new();
        for (index, value) in order.iter().enumerate() {
            let value = value.as_ref();
            match value.parse::<BootId>() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    return Err(ApplyError::InvalidId {
                        index,
                        value: value.to_string(),
                    })
                }
            }
        }
        self.apply(&ids)
    }

    /// Commits an already-validated [`BootOrder`].
    pub fn apply(&self, order: &BootOrder) -> Result<(), ApplyError> {
        let arg = order.to_arg();
        log::info!("Setting boot order to {arg}");
        self.invoker.invoke(&["-o", &arg])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvokeError;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    /// Records every invocation and replies with a canned result.
    struct FakeUtility {
        stdout: &'static str,
        stderr: Option<&'static str>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeUtility {
        fn new(stdout: &'static str) -> Self {
            FakeUtility {
                stdout,
                stderr: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(stderr: &'static str) -> Self {
            FakeUtility {
                stdout: "",
                stderr: Some(stderr),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }
    }

    impl Invoker for &FakeUtility {
        fn invoke(&self, args: &[&str]) -> Result<String, InvokeError> {
            self.calls
                .borrow_mut()
                .push(args.iter().map(|s| s.to_string()).collect());
            match self.stderr {
                Some(stderr) => Err(InvokeError::Failed {
                    utility: "efibootmgr".into(),
                    status: ExitStatus::from_raw(1 << 8),
                    stderr: stderr.to_string(),
                }),
                None => Ok(self.stdout.to_string()),
            }
        }
    }

    const SAMPLE: &str = "BootCurrent: 0000\nBoot0000* opensuse\nBoot0001  Windows Boot Manager\n";

    #[test]
    fn list_entries_invokes_without_flags_and_parses() {
        let utility = FakeUtility::new(SAMPLE);
        let manager = BootManager::new(&utility);

        let info = manager.list_entries().unwrap();
        assert_eq!(utility.calls(), vec![Vec::<String>::new()]);
        assert_eq!(info.entries.len(), 2);
        assert!(info.entries[0].is_default);
    }

    #[test]
    fn list_entries_is_a_fresh_invocation_each_time() {
        let utility = FakeUtility::new(SAMPLE);
        let manager = BootManager::new(&utility);
        manager.list_entries().unwrap();
        manager.list_entries().unwrap();
        assert_eq!(utility.calls().len(), 2);
    }

    #[test]
    fn apply_order_joins_ids_with_commas() {
        let utility = FakeUtility::new("");
        let manager = BootManager::new(&utility);

        manager.apply_order(&["0000", "0001", "0003"]).unwrap();
        assert_eq!(utility.calls(), vec![vec!["-o".to_string(), "0000,0001,0003".to_string()]]);
    }

    #[test]
    fn apply_order_canonicalizes_to_uppercase() {
        let utility = FakeUtility::new("");
        let manager = BootManager::new(&utility);

        manager.apply_order(&["abcd", "0001"]).unwrap();
        assert_eq!(utility.calls(), vec![vec!["-o".to_string(), "ABCD,0001".to_string()]]);
    }

    #[test]
    fn invalid_id_fails_before_any_invocation() {
        let utility = FakeUtility::new("");
        let manager = BootManager::new(&utility);

        let err = manager.apply_order(&["0000", "ZZZZ"]).unwrap_err();
        match err {
            ApplyError::InvalidId { index, value } => {
                assert_eq!(index, 1);
                assert_eq!(value, "ZZZZ");
            }
            other => panic!("expected InvalidId, got {other:?}"),
        }
        assert_eq!(utility.calls().len(), 0);
    }

    #[test]
    fn applying_twice_is_two_independent_invocations() {
        let utility = FakeUtility::new("");
        let manager = BootManager::new(&utility);

        manager.apply_order(&["0001", "0000"]).unwrap();
        manager.apply_order(&["0001", "0000"]).unwrap();
        let expected = vec!["-o".to_string(), "0001,0000".to_string()];
        assert_eq!(utility.calls(), vec![expected.clone(), expected]);
    }

    #[test]
    fn utility_rejection_surfaces_as_commit_error() {
        let utility = FakeUtility::failing("Boot entry 0009 not found");
        let manager = BootManager::new(&utility);

        let err = manager.apply_order(&["0009"]).unwrap_err();
        match err {
            ApplyError::Commit(InvokeError::Failed { stderr, .. }) => {
                assert_eq!(stderr, "Boot entry 0009 not found");
            }
            other => panic!("expected Commit, got {other:?}"),
        }
    }

    #[test]
    fn utility_failure_surfaces_as_list_error() {
        let utility = FakeUtility::failing("Authorization required");
        let manager = BootManager::new(&utility);
        assert!(matches!(
            manager.list_entries(),
            Err(ListError::Invoke(InvokeError::Failed { .. }))
        ));
    }
}
