use std::fmt::{Display, Formatter};

/// Outcome of checking a VM against the capacity of a single host.
///
/// Dimensions are checked in a fixed order (processing elements, MIPS,
/// memory, bandwidth, storage), so a non-success verdict names the first
/// violated dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocationVerdict {
    Success,
    NotEnoughPes,
    NotEnoughMips,
    NotEnoughMemory,
    NotEnoughBandwidth,
    NotEnoughStorage,
    HostNotFound,
}

impl AllocationVerdict {
    pub fn is_success(&self) -> bool {
        *self == AllocationVerdict::Success
    }
}

impl Display for AllocationVerdict {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            AllocationVerdict::Success => write!(f, "success"),
            AllocationVerdict::NotEnoughPes => write!(f, "not enough free processing elements"),
            AllocationVerdict::NotEnoughMips => write!(f, "not enough MIPS per processing element"),
            AllocationVerdict::NotEnoughMemory => write!(f, "not enough memory"),
            AllocationVerdict::NotEnoughBandwidth => write!(f, "not enough bandwidth"),
            AllocationVerdict::NotEnoughStorage => write!(f, "not enough storage"),
            AllocationVerdict::HostNotFound => write!(f, "host not found"),
        }
    }
}
