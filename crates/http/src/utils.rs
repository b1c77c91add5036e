/// Returns early with `Err($error)` when the predicate does not hold.
///
/// ```ignore
/// ensure!(version == Version::HTTP_11, TransportError::invalid_request("only HTTP/1.1 is supported"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
