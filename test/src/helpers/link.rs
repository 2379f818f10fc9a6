use statecast_shared::{
    BitArchive, ConnectionContext, ConnectionId, FieldMask, HostType, NetId, Protocol,
    RemoteReplicas, ReplicaHost, ReplicationError,
};

/// The client end of one connection
///
/// Every message the host writes for `connection` is handed to `remote` as
/// raw bytes, the way a channel would deliver it.
pub struct TestLink {
    pub connection: ConnectionId,
    pub is_owner: bool,
    pub remote: RemoteReplicas,
}

impl TestLink {
    pub fn new(protocol: &Protocol, connection: u64, is_owner: bool) -> Self {
        Self {
            connection: ConnectionId::new(connection),
            is_owner,
            remote: RemoteReplicas::new(protocol.build_factory(HostType::Client)),
        }
    }

    pub fn context(&self, now: f64) -> ConnectionContext {
        ConnectionContext::new(self.is_owner, now)
    }

    /// Spawns `net_id` on the remote, returns the fields the host sent
    pub fn spawn(
        &mut self,
        host: &mut ReplicaHost,
        net_id: NetId,
        now: f64,
    ) -> Result<FieldMask, ReplicationError> {
        let mut writer = BitArchive::writer();
        let sent = host.write_spawn(net_id, self.connection, &self.context(now), &mut writer)?;
        let mut reader = BitArchive::reader(writer.to_bytes());
        self.remote.read_spawn(&mut reader)?;
        Ok(sent)
    }

    /// Sends one object's changes
    ///
    /// Returns the fields the remote saw change, `None` when the host had
    /// nothing to send.
    pub fn update(
        &mut self,
        host: &mut ReplicaHost,
        net_id: NetId,
        now: f64,
    ) -> Result<Option<FieldMask>, ReplicationError> {
        let mut writer = BitArchive::writer();
        let sent = host.write_update(net_id, self.connection, &self.context(now), &mut writer)?;
        if sent.is_clear() {
            return Ok(None);
        }
        let mut reader = BitArchive::reader(writer.to_bytes());
        let changed = self.remote.apply_update(net_id, &mut reader)?;
        Ok(Some(changed))
    }

    /// Sends one batch covering every spawned object with changes
    pub fn sync(
        &mut self,
        host: &mut ReplicaHost,
        now: f64,
    ) -> Result<Vec<(NetId, FieldMask)>, ReplicationError> {
        let is_owner = self.is_owner;
        let mut writer = BitArchive::writer();
        host.write_updates(
            self.connection,
            |_| ConnectionContext::new(is_owner, now),
            &mut writer,
        )?;
        let mut reader = BitArchive::reader(writer.to_bytes());
        self.remote.read_updates(&mut reader)
    }

    pub fn despawn(&mut self, host: &mut ReplicaHost, net_id: NetId) -> Result<(), ReplicationError> {
        let mut writer = BitArchive::writer();
        host.write_despawn(net_id, &mut writer)?;
        let mut reader = BitArchive::reader(writer.to_bytes());
        self.remote.read_despawn(&mut reader)?;
        Ok(())
    }
}
