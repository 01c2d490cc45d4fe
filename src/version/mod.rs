//! Framework version parsing and comparison
//!
//! The only thing the build needs to know about a functions-framework version
//! is whether it is at least a given release, so [`Version`] is a small
//! immutable value exposing [`Version::parse_tolerant`] and
//! [`Version::at_least`].
//!
//! # Tolerant parsing
//!
//! Versions come from `go list -m` output or from constants, and are accepted
//! in the forms Go tooling produces:
//!
//! | Input | Parsed |
//! |-------|--------|
//! | `v1.1.0` | `1.1.0` |
//! | ` 1.2 ` | `1.2.0` |
//! | `v01.02.03` | `1.2.3` |
//! | `v1.1.0-rc1` | `1.1.0-rc1` |
//! | `v0.0.0-20200508153525-0f3d0c1b5ac0` | `0.0.0-20200508153525-0f3d0c1b5ac0` |
//! | `v2.0.0+incompatible` | `2.0.0+incompatible` |
//!
//! Short versions (`1`, `1.2`) are padded with zeros but may not carry
//! pre-release or build metadata.

use std::fmt;

use crate::core::GofnError;

/// A semantic version triple with optional pre-release and build metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    /// Major component
    pub major: u64,
    /// Minor component
    pub minor: u64,
    /// Patch component
    pub patch: u64,
    /// Pre-release identifiers after `-`, if any
    pub pre: Option<String>,
    /// Build metadata after `+`, if any
    pub build: Option<String>,
}

impl Version {
    /// Creates a release version without metadata.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
            build: None,
        }
    }

    /// Parses a version, accepting a leading `v`, surrounding whitespace,
    /// leading zeros and missing minor/patch components.
    ///
    /// # Errors
    ///
    /// [`GofnError::VersionParse`] carrying the original literal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gofn::version::Version;
    ///
    /// let v = Version::parse_tolerant("v1.1.0-rc1").unwrap();
    /// assert_eq!((v.major, v.minor, v.patch), (1, 1, 0));
    /// assert_eq!(v.pre.as_deref(), Some("rc1"));
    ///
    /// assert!(Version::parse_tolerant("latest").is_err());
    /// ```
    pub fn parse_tolerant(input: &str) -> Result<Self, GofnError> {
        let fail = |reason: &str| GofnError::VersionParse {
            version: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(fail("empty version string"));
        }

        let parts: Vec<&str> = trimmed.splitn(3, '.').collect();
        if parts.len() < 3 && parts.last().is_some_and(|p| p.contains(['-', '+'])) {
            return Err(fail("short version cannot contain pre-release or build metadata"));
        }

        // The last part may carry `-pre` and `+build` suffixes.
        let (core_last, build) = match parts[parts.len() - 1].split_once('+') {
            Some((head, build)) => (head, Some(build)),
            None => (parts[parts.len() - 1], None),
        };
        let (core_last, pre) = match core_last.split_once('-') {
            Some((head, pre)) => (head, Some(pre)),
            None => (core_last, None),
        };

        let mut numbers = [0_u64; 3];
        for (index, slot) in numbers.iter_mut().enumerate() {
            let raw = match index.cmp(&(parts.len() - 1)) {
                std::cmp::Ordering::Less => parts[index],
                std::cmp::Ordering::Equal => core_last,
                std::cmp::Ordering::Greater => "0",
            };
            *slot = parse_numeric(raw).map_err(|reason| fail(&reason))?;
        }

        let pre = pre
            .map(|p| validate_identifiers(p, "pre-release"))
            .transpose()
            .map_err(|reason| fail(&reason))?;
        let build = build
            .map(|b| validate_identifiers(b, "build"))
            .transpose()
            .map_err(|reason| fail(&reason))?;

        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre,
            build,
        })
    }

    /// Whether this version's release core is at least `other`'s.
    ///
    /// Only `(major, minor, patch)` take part: a pre-release of a release
    /// counts as that release, so `1.1.0-rc1` is at least `1.1.0`. Build
    /// metadata never matters.
    #[must_use]
    pub fn at_least(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) >= (other.major, other.minor, other.patch)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

fn parse_numeric(raw: &str) -> Result<u64, String> {
    if raw.is_empty() {
        return Err("empty numeric component".to_string());
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid character in numeric component '{raw}'"));
    }
    // Leading zeros are tolerated ("01" -> 1)
    raw.parse::<u64>().map_err(|e| format!("numeric component '{raw}' out of range: {e}"))
}

fn validate_identifiers(raw: &str, what: &str) -> Result<String, String> {
    for identifier in raw.split('.') {
        if identifier.is_empty() {
            return Err(format!("empty {what} identifier"));
        }
        if !identifier.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(format!("invalid character in {what} identifier '{identifier}'"));
        }
    }
    Ok(raw.to_string())
}
