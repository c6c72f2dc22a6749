//! Legacy entry points with no 826 behavior.
//!
//! A number of 626 calls exercise hardware the 826 simply does not have
//! (battery backup, raw register access) or models so differently that no
//! call-for-call translation exists (edge capture, interrupt enables, the
//! raw counter mode word). Rather than silently returning a default, each
//! such call goes through [`Session::unsupported`], which emits exactly one
//! diagnostic naming the entry point and the closest modern primitive, makes
//! no driver call, and returns a tagged [`Outcome`] so the caller can see
//! which branch it got.

use crate::hal::S826Driver;
use crate::session::Session;

/// Legacy 626 entry points with no 826 equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum UnsupportedOp {
    GetErrors,
    RegRead,
    RegWrite,
    InterruptEnable,
    InterruptStatus,
    DioModeSet,
    DioModeGet,
    DioEdgeSet,
    DioEdgeGet,
    DioCapEnableSet,
    DioCapEnableGet,
    DioCapStatus,
    DioCapReset,
    DioIntEnableSet,
    DioIntEnableGet,
    CounterCapStatus,
    CounterCapFlagsReset,
    CounterModeSet,
    CounterModeGet,
    BackupEnableGet,
    BackupEnableSet,
    ChargeEnableGet,
    ChargeEnableSet,
}

impl UnsupportedOp {
    /// Every unsupported entry point, for exhaustive reporting and tests.
    pub const ALL: [UnsupportedOp; 23] = [
        Self::GetErrors,
        Self::RegRead,
        Self::RegWrite,
        Self::InterruptEnable,
        Self::InterruptStatus,
        Self::DioModeSet,
        Self::DioModeGet,
        Self::DioEdgeSet,
        Self::DioEdgeGet,
        Self::DioCapEnableSet,
        Self::DioCapEnableGet,
        Self::DioCapStatus,
        Self::DioCapReset,
        Self::DioIntEnableSet,
        Self::DioIntEnableGet,
        Self::CounterCapStatus,
        Self::CounterCapFlagsReset,
        Self::CounterModeSet,
        Self::CounterModeGet,
        Self::BackupEnableGet,
        Self::BackupEnableSet,
        Self::ChargeEnableGet,
        Self::ChargeEnableSet,
    ];

    /// The legacy entry point name, as ported code spells it.
    pub fn name(self) -> &'static str {
        match self {
            Self::GetErrors => "S626_GetErrors()",
            Self::RegRead => "S626_RegRead()",
            Self::RegWrite => "S626_RegWrite()",
            Self::InterruptEnable => "S626_InterruptEnable()",
            Self::InterruptStatus => "S626_InterruptStatus()",
            Self::DioModeSet => "S626_DIOModeSet()",
            Self::DioModeGet => "S626_DIOModeGet()",
            Self::DioEdgeSet => "S626_DIOEdgeSet()",
            Self::DioEdgeGet => "S626_DIOEdgeGet()",
            Self::DioCapEnableSet => "S626_DIOCapEnableSet()",
            Self::DioCapEnableGet => "S626_DIOCapEnableGet()",
            Self::DioCapStatus => "S626_DIOCapStatus()",
            Self::DioCapReset => "S626_DIOCapReset()",
            Self::DioIntEnableSet => "S626_DIOIntEnableSet()",
            Self::DioIntEnableGet => "S626_DIOIntEnableGet()",
            Self::CounterCapStatus => "S626_CounterCapStatus()",
            Self::CounterCapFlagsReset => "S626_CounterCapFlagsReset()",
            Self::CounterModeSet => "S626_CounterModeSet()",
            Self::CounterModeGet => "S626_CounterModeGet()",
            Self::BackupEnableGet => "S626_BackupEnableGet()",
            Self::BackupEnableSet => "S626_BackupEnableSet()",
            Self::ChargeEnableGet => "S626_ChargeEnableGet()",
            Self::ChargeEnableSet => "S626_ChargeEnableSet()",
        }
    }

    /// Where a port should look instead.
    pub fn hint(self) -> &'static str {
        match self {
            Self::GetErrors => "the status code returned by each individual call",
            Self::RegRead | Self::RegWrite => {
                "the documented API calls; raw register access is not exposed"
            }
            Self::InterruptEnable | Self::InterruptStatus => {
                "blocking event waits such as S826_CounterSnapshotRead() \
                 and S826_WatchdogEventWait()"
            }
            Self::DioModeSet | Self::DioModeGet => "S826_DioOutputSourceWrite()",
            Self::DioEdgeSet | Self::DioEdgeGet => {
                "the rising/falling masks of S826_DioCapEnablesWrite()"
            }
            Self::DioCapEnableSet | Self::DioCapEnableGet => "S826_DioCapEnablesWrite()",
            Self::DioCapStatus | Self::DioCapReset => "S826_DioCapRead()",
            Self::DioIntEnableSet | Self::DioIntEnableGet => {
                "a thread blocking in S826_DioCapRead()"
            }
            Self::CounterCapStatus | Self::CounterCapFlagsReset => {
                "the reason flags returned by S826_CounterSnapshotRead()"
            }
            Self::CounterModeSet | Self::CounterModeGet => {
                "S826_CounterModeWrite() with a mode word rebuilt for the 826 fields"
            }
            Self::BackupEnableGet
            | Self::BackupEnableSet
            | Self::ChargeEnableGet
            | Self::ChargeEnableSet => "the 826 hardware manual; there is no battery subsystem",
        }
    }
}

/// Result of dispatching one legacy call through the migration layer.
///
/// `Supported` carries the translated call's value; `Unsupported` carries
/// the legacy entry point name that could not be translated. This replaces
/// the original aid's convention of stubbing unsupported calls to return 0,
/// which made a missing translation indistinguishable from a real result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The call translated; here is its value.
    Supported(T),
    /// The call has no translation; the legacy entry point name.
    Unsupported(&'static str),
}

impl<T> Outcome<T> {
    /// The carried value, or `default` for an unsupported call.
    ///
    /// This recovers the original stub convention (`value_or(0)`) for
    /// ported code that cannot yet branch on the tag.
    pub fn value_or(self, default: T) -> T {
        match self {
            Self::Supported(value) => value,
            Self::Unsupported(_) => default,
        }
    }

    /// True if the call translated.
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }
}

impl<D: S826Driver> Session<D> {
    /// Dispatch a legacy entry point that has no 826 translation.
    ///
    /// Emits exactly one diagnostic naming the entry point and the closest
    /// modern primitive, touches no hardware, and returns the tagged
    /// unsupported outcome.
    pub fn unsupported(&self, op: UnsupportedOp) -> Outcome<u16> {
        self.notify(&format!(
            "{} has no 826 equivalent; see {}",
            op.name(),
            op.hint()
        ));
        Outcome::Unsupported(op.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_variant() {
        // Names are unique, so ALL holding 23 distinct names means every
        // variant is listed.
        let mut names: Vec<_> = UnsupportedOp::ALL.iter().map(|op| op.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), UnsupportedOp::ALL.len());
    }

    #[test]
    fn test_names_are_legacy_spelled() {
        for op in UnsupportedOp::ALL {
            assert!(op.name().starts_with("S626_"), "{}", op.name());
            assert!(op.name().ends_with("()"), "{}", op.name());
            assert!(!op.hint().is_empty());
        }
    }

    #[test]
    fn test_outcome_value_or() {
        assert_eq!(Outcome::Supported(7u16).value_or(0), 7);
        assert_eq!(Outcome::<u16>::Unsupported("S626_RegRead()").value_or(0), 0);
        assert!(Outcome::Supported(()).is_supported());
        assert!(!Outcome::<u16>::Unsupported("x").is_supported());
    }
}
