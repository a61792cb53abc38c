use nom::bytes::complete::take;
use nom::IResult;

use crate::TraceError;

/// Read exactly `N` bytes into a fixed-size array
#[inline]
pub(crate) fn take_array<const N: usize>(i: &[u8]) -> IResult<&[u8], [u8; N], TraceError> {
    let (i, bytes) = take(N)(i)?;
    let mut array = [0u8; N];
    array.copy_from_slice(bytes);
    Ok((i, array))
}

#[cfg(test)]
mod tests {
    use super::take_array;
    use crate::TraceError;

    #[test]
    fn test_take_array() {
        let (rem, a) = take_array::<4>(&[1, 2, 3, 4, 5]).expect("take_array");
        assert_eq!(a, [1, 2, 3, 4]);
        assert_eq!(rem, &[5]);
        let err = take_array::<4>(&[1, 2]).unwrap_err();
        assert!(matches!(
            err,
            nom::Err::Error(TraceError::InsufficientLength)
        ));
    }
}
