//! 지표 계산 전 최소 행 수 검증.
//!
//! 이동/롤링 계산은 윈도우 크기보다 적은 데이터에서 정의되지 않으므로,
//! NaN이 섞인 결과를 돌려주는 대신 계산 전에 실패합니다.

use crate::error::{CollectorError, Result};

/// `row_count`가 `required`보다 적으면 `InsufficientData`로 실패합니다.
pub fn validate_min_rows(row_count: usize, required: usize, label: &str) -> Result<()> {
    if row_count < required {
        return Err(CollectorError::InsufficientData {
            label: label.to_string(),
            required,
            provided: row_count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundary() {
        assert!(validate_min_rows(60, 60, "Trend indicators (SMA/EMA)").is_ok());

        let err = validate_min_rows(59, 60, "Trend indicators (SMA/EMA)").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Trend indicators"));
        assert!(message.contains("59"));
        assert!(message.contains("60"));
    }

    #[test]
    fn test_zero_required() {
        assert!(validate_min_rows(0, 0, "Volume indicators (OBV/VMA)").is_ok());
    }

    proptest! {
        #[test]
        fn prop_fails_iff_below_required(rows in 0usize..500, required in 0usize..500) {
            let result = validate_min_rows(rows, required, "label");
            prop_assert_eq!(result.is_err(), rows < required);
        }
    }
}
