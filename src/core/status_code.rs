/*
 * Bit-level decoding of the 32-bit status codes (HRESULTs) returned by the
 * native shell dialog service. Everything here is pure arithmetic over the
 * `StatusCode` newtype: no call can fail, malformed input simply decodes as
 * invalid.
 *
 * Layout, most significant bit first:
 *   S R C N X FFFFFFFFFFF CCCCCCCCCCCCCCCC
 * S = severity, R = reserved, C = customer, N = NTSTATUS, X = reserved,
 * F = 11-bit facility, C = 16-bit code.
 */
use std::fmt;

// Bytes:                                  3333_3333   2222_2222   1111_1111   0000_0000
const CODE_BIT_MASK: u32 = 0b_0000_0000_0000_0000_1111_1111_1111_1111;
const FACILITY_BIT_MASK: u32 = 0b_0000_0111_1111_1111_0000_0000_0000_0000;
const RESERVED_X_BIT_MASK: u32 = 0b_0000_1000_0000_0000_0000_0000_0000_0000;
const NT_STATUS_BIT_MASK: u32 = 0b_0001_0000_0000_0000_0000_0000_0000_0000;
const CUSTOMER_BIT_MASK: u32 = 0b_0010_0000_0000_0000_0000_0000_0000_0000;
const RESERVED_BIT_MASK: u32 = 0b_0100_0000_0000_0000_0000_0000_0000_0000;
const SEVERITY_BIT_MASK: u32 = 0b_1000_0000_0000_0000_0000_0000_0000_0000;

const FACILITY_SHIFT: u32 = 16;

/// Win32 `ERROR_SUCCESS`.
pub const ERROR_SUCCESS: u16 = 0;
/// Win32 `ERROR_CANCELLED`, reported by `Show` when the user dismisses the dialog.
pub const ERROR_CANCELLED: u16 = 1223;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Customer {
    SystemDefined,
    CustomerDefined,
}

/// The 11-bit facility field. Only the facilities this crate reasons about
/// are named; everything else is carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facility {
    /// FACILITY_NULL, the default facility.
    Null,
    /// FACILITY_RPC, the RPC/COM marshalling subsystem.
    Rpc,
    /// FACILITY_WIN32, undecorated Win32 error codes mapped into a status code.
    Win32,
    /// FACILITY_WINDOWS.
    Windows,
    Other(u16),
}

impl Facility {
    pub const MAX_VALUE: u16 = 2047;

    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0 => Facility::Null,
            1 => Facility::Rpc,
            7 => Facility::Win32,
            8 => Facility::Windows,
            other => Facility::Other(other),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Facility::Null => 0,
            Facility::Rpc => 1,
            Facility::Win32 => 7,
            Facility::Windows => 8,
            Facility::Other(raw) => raw,
        }
    }
}

/// A raw 32-bit status code as returned by a native call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(0);
    pub const FALSE: StatusCode = StatusCode(1);
    /// `HRESULT_FROM_WIN32(ERROR_CANCELLED)`.
    pub const CANCELLED: StatusCode = StatusCode(0x8007_04C7);
    /// `RPC_E_WRONG_THREAD`: the dialog interface was called through an
    /// interface pointer that belongs to another apartment.
    pub const RPC_E_WRONG_THREAD: StatusCode = StatusCode(0x8001_010E);

    /// Builds a well-formed status code from its fields.
    pub fn from_parts(severity: Severity, facility: Facility, code: u16) -> Self {
        let severity_bits = match severity {
            Severity::Success => 0,
            Severity::Failure => SEVERITY_BIT_MASK,
        };
        let facility_bits =
            ((facility.to_raw() as u32) << FACILITY_SHIFT) & FACILITY_BIT_MASK;
        StatusCode(severity_bits | facility_bits | code as u32)
    }

    /// `HRESULT_FROM_WIN32`: wraps a Win32 error code, leaving zero as success.
    pub fn from_win32(code: u16) -> Self {
        if code == ERROR_SUCCESS {
            StatusCode::OK
        } else {
            StatusCode::from_parts(Severity::Failure, Facility::Win32, code)
        }
    }

    pub fn from_i32(raw: i32) -> Self {
        StatusCode(raw as u32)
    }

    pub fn raw(self) -> u32 {
        self.0
    }

    pub fn as_i32(self) -> i32 {
        self.0 as i32
    }

    pub fn severity(self) -> Severity {
        if self.0 & SEVERITY_BIT_MASK == 0 {
            Severity::Success
        } else {
            Severity::Failure
        }
    }

    pub fn customer(self) -> Customer {
        if self.0 & CUSTOMER_BIT_MASK == 0 {
            Customer::SystemDefined
        } else {
            Customer::CustomerDefined
        }
    }

    pub fn facility(self) -> Facility {
        let facility_bits = (self.0 & FACILITY_BIT_MASK) >> FACILITY_SHIFT;
        Facility::from_raw(facility_bits as u16)
    }

    pub fn code(self) -> u16 {
        (self.0 & CODE_BIT_MASK) as u16
    }

    /*
     * Checks that the bits required to be zero are zero. A set N bit means the
     * value is an NTSTATUS (or some other 32-bit value), which decodes under a
     * different layout and is never accepted here. With N clear, R must be
     * clear too, and X is always expected to be clear.
     */
    pub fn is_valid(self) -> bool {
        if self.0 & NT_STATUS_BIT_MASK != 0 {
            return false;
        }
        if self.0 & RESERVED_BIT_MASK != 0 {
            return false;
        }
        self.0 & RESERVED_X_BIT_MASK == 0
    }

    /*
     * Attempts to recover the legacy Win32 error code carried by this status.
     * The returned code is always the low 16 bits, but the flag is `true` only
     * when the status is valid, system-defined, and either a Win32-facility code
     * whose severity agrees with the code, or a non-negative status from any
     * other facility.
     */
    pub fn try_get_legacy_error_code(self) -> (bool, u16) {
        let legacy_code = self.code();

        if !self.is_valid() {
            return (false, legacy_code);
        }
        if self.customer() != Customer::SystemDefined {
            return (false, legacy_code);
        }
        if self.facility() == Facility::Win32 {
            let severity_matches = match self.severity() {
                Severity::Success => legacy_code == ERROR_SUCCESS,
                Severity::Failure => legacy_code != ERROR_SUCCESS,
            };
            return (severity_matches, legacy_code);
        }
        (self.as_i32() >= 0, legacy_code)
    }

    pub fn is_success(self) -> bool {
        self.severity() == Severity::Success
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({:#010X})", self.0)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

impl From<i32> for StatusCode {
    fn from(raw: i32) -> Self {
        StatusCode::from_i32(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_extraction_for_cancelled() {
        let status = StatusCode::CANCELLED;
        assert_eq!(status.severity(), Severity::Failure);
        assert_eq!(status.customer(), Customer::SystemDefined);
        assert_eq!(status.facility(), Facility::Win32);
        assert_eq!(status.code(), ERROR_CANCELLED);
        assert!(status.is_valid());
    }

    #[test]
    fn test_facility_covers_full_eleven_bits() {
        let status = StatusCode(0x07FF_0000);
        assert_eq!(status.facility(), Facility::Other(Facility::MAX_VALUE));
        assert_eq!(StatusCode::RPC_E_WRONG_THREAD.facility(), Facility::Rpc);
        assert_eq!(StatusCode(0x8008_0001).facility(), Facility::Windows);
    }

    #[test]
    fn test_customer_bit() {
        assert_eq!(StatusCode(0x2000_0000).customer(), Customer::CustomerDefined);
        assert_eq!(StatusCode::OK.customer(), Customer::SystemDefined);
    }

    #[test]
    fn test_nt_status_bit_always_invalid() {
        // Sample across the other bits; N set must never validate.
        let samples = [0u32, 0x8000_0000, 0x4000_0000, 0x0007_04C7, 0xFFFF_FFFF, 0x2ABC_1234];
        for sample in samples {
            let status = StatusCode(sample | NT_STATUS_BIT_MASK);
            assert!(!status.is_valid(), "{status} should be invalid");
        }
    }

    #[test]
    fn test_reserved_bit_flips_validity() {
        let samples = [0u32, 0x8007_04C7, 0x8001_010E, 0x0000_0001, 0xA7FF_FFFF];
        for sample in samples {
            let status = StatusCode(sample);
            assert!(status.is_valid(), "{status} should be valid");
            let flipped = StatusCode(sample | RESERVED_BIT_MASK);
            assert!(!flipped.is_valid(), "{flipped} should be invalid");
        }
    }

    #[test]
    fn test_reserved_x_bit_invalid() {
        assert!(!StatusCode(RESERVED_X_BIT_MASK).is_valid());
    }

    #[test]
    fn test_legacy_code_win32_success() {
        let status = StatusCode::from_parts(Severity::Success, Facility::Win32, 0);
        assert_eq!(status.try_get_legacy_error_code(), (true, 0));
    }

    #[test]
    fn test_legacy_code_win32_failure() {
        let status = StatusCode::from_parts(Severity::Failure, Facility::Win32, 5);
        assert_eq!(status.try_get_legacy_error_code(), (true, 5));
    }

    #[test]
    fn test_legacy_code_inconsistent_severity_rejected() {
        // Severity says success while the code says failure.
        let status = StatusCode::from_parts(Severity::Success, Facility::Win32, 5);
        assert_eq!(status.try_get_legacy_error_code(), (false, 5));
    }

    #[test]
    fn test_legacy_code_inconsistent_failure_with_zero_code() {
        let status = StatusCode::from_parts(Severity::Failure, Facility::Win32, 0);
        assert_eq!(status.try_get_legacy_error_code(), (false, 0));
    }

    #[test]
    fn test_legacy_code_rejects_customer_and_invalid() {
        let customer = StatusCode(0xA007_0005);
        assert_eq!(customer.try_get_legacy_error_code(), (false, 5));

        let nt_status = StatusCode(0xD000_0022);
        assert_eq!(nt_status.try_get_legacy_error_code(), (false, 0x0022));
    }

    #[test]
    fn test_legacy_code_non_win32_failure_rejected() {
        let (ok, code) = StatusCode::RPC_E_WRONG_THREAD.try_get_legacy_error_code();
        assert!(!ok);
        assert_eq!(code, 0x010E);
    }

    #[test]
    fn test_legacy_code_non_negative_system_code() {
        assert_eq!(StatusCode::FALSE.try_get_legacy_error_code(), (true, 1));
        assert_eq!(StatusCode::OK.try_get_legacy_error_code(), (true, 0));
    }

    #[test]
    fn test_from_win32() {
        assert_eq!(StatusCode::from_win32(ERROR_CANCELLED), StatusCode::CANCELLED);
        assert_eq!(StatusCode::from_win32(0), StatusCode::OK);
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(StatusCode::CANCELLED.to_string(), "0x800704C7");
        assert_eq!(StatusCode::from(-2147023673i32), StatusCode::CANCELLED);
    }
}
