/// Names a replicable class and its place in the replicated hierarchy
///
/// A logical object may have one concrete class on the server and another on
/// the client. Both name each other through `SERVER_CLASS` and
/// `CLIENT_CLASS`, and must either extend one another or share a
/// `BASE_CLASS` so that they resolve to one class id.
pub trait ClassLineage: 'static {
    /// Fully qualified name, the source of the class id
    const CLASS_NAME: &'static str;

    /// Closest replicated ancestor, if any
    const BASE_CLASS: Option<&'static str> = None;

    /// Concrete class constructed on the server for this object
    const SERVER_CLASS: &'static str = Self::CLASS_NAME;

    /// Concrete class constructed on the client for this object
    const CLIENT_CLASS: &'static str = Self::CLASS_NAME;
}
