/// Returns early with `Err($error)` when the predicate does not hold.
///
/// ```ignore
/// ensure!(!key.is_empty(), ParameterError::EmptyKey);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
