/// What the connection layer knows about one replication pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConnectionContext {
    /// The connection owns the object being replicated
    pub is_owner: bool,
    /// Forces the initial state out, as on a fresh snapshot
    pub is_initial_send: bool,
    /// Current time in seconds, for update-rate gating
    pub now: f64,
}

impl ConnectionContext {
    pub fn new(is_owner: bool, now: f64) -> Self {
        Self {
            is_owner,
            is_initial_send: false,
            now,
        }
    }

    pub fn owner(now: f64) -> Self {
        Self::new(true, now)
    }

    pub fn observer(now: f64) -> Self {
        Self::new(false, now)
    }

    pub fn initial(mut self) -> Self {
        self.is_initial_send = true;
        self
    }
}
