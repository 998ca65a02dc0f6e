//! Shared sample handling for both classifier strategies

use crate::errors::{ConfigError, ConfigResult, SensorError};

/// Outcome of a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// Subject closer than the threshold
    Occupied,
    /// Subject at or beyond the threshold
    Vacant,
    /// Read failed or returned a non-number
    Abstain,
}

/// Turn one reading into a vote
///
/// A reading exactly at the threshold counts as vacant.
pub fn classify_reading(reading: nb::Result<f32, SensorError>, threshold_cm: f32) -> Vote {
    match reading {
        Ok(distance) if !distance.is_finite() => Vote::Abstain,
        Ok(distance) if distance < threshold_cm => Vote::Occupied,
        Ok(_) => Vote::Vacant,
        Err(_) => Vote::Abstain,
    }
}

/// Threshold must be a positive, finite distance
pub(crate) fn check_threshold(threshold_cm: f32) -> ConfigResult<f32> {
    if threshold_cm.is_finite() && threshold_cm > 0.0 {
        Ok(threshold_cm)
    } else {
        Err(ConfigError::InvalidThreshold { value: threshold_cm })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn votes_follow_threshold() {
        assert_eq!(classify_reading(Ok(30.0), 60.0), Vote::Occupied);
        assert_eq!(classify_reading(Ok(90.0), 60.0), Vote::Vacant);
        assert_eq!(classify_reading(Ok(60.0), 60.0), Vote::Vacant);
    }

    #[test]
    fn failures_abstain() {
        assert_eq!(classify_reading(Err(nb::Error::WouldBlock), 60.0), Vote::Abstain);
        assert_eq!(
            classify_reading(Err(nb::Error::Other(SensorError::Timeout)), 60.0),
            Vote::Abstain
        );
        assert_eq!(classify_reading(Ok(f32::NAN), 60.0), Vote::Abstain);
        assert_eq!(classify_reading(Ok(f32::INFINITY), 60.0), Vote::Abstain);
    }

    #[test]
    fn threshold_check() {
        assert!(check_threshold(60.0).is_ok());
        assert!(check_threshold(0.0).is_err());
        assert!(check_threshold(-5.0).is_err());
        assert!(check_threshold(f32::NAN).is_err());
    }
}
