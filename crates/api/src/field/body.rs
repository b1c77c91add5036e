use crate::field::Encoding;

keyed_parameter! {
    /// A member of the json object sent as request body.
    ///
    /// All `Json` fields of one request are merged into a single object,
    /// keyed by their field keys in declaration order.
    Json => Encoding::JsonBody
}

keyed_parameter! {
    /// A pair of the `application/x-www-form-urlencoded` request body.
    Field => Encoding::UrlBody
}
