/// Per-connection change detection: idempotence, initial-only fields,
/// update rates, list shrink and connection teardown
use statecast_shared::{BitArchive, NetId, Replica, ReplicaHost, Vector2};
use statecast_test::{protocol, Avatar, Inventory, Marker, TestLink};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const MARKER: NetId = NetId::new(7);
const BAG: NetId = NetId::new(8);

fn marker_host() -> (ReplicaHost, TestLink) {
    init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();
    let marker = Marker {
        label: "camp".to_string(),
        position: Vector2::new(1.0, 2.0),
    };
    host.insert(Box::new(protocol.replicate(marker, MARKER))).unwrap();
    (host, TestLink::new(&protocol, 1, false))
}

#[test]
fn unchanged_object_sends_nothing_on_second_pass() {
    let (mut host, mut link) = marker_host();

    let first = link.spawn(&mut host, MARKER, 0.0).unwrap();
    assert_eq!(first.bits(), 0b11);

    let mut writer = BitArchive::writer();
    let second = host
        .write_update(MARKER, link.connection, &link.context(10.0), &mut writer)
        .unwrap();
    assert!(second.is_clear());
    assert!(writer.to_bytes().is_empty());
}

#[test]
fn initial_only_field_is_sent_once() {
    let (mut host, mut link) = marker_host();
    link.spawn(&mut host, MARKER, 0.0).unwrap();

    host.get_mut::<Marker>(MARKER).unwrap().object_mut().label = "ruins".to_string();

    assert_eq!(link.update(&mut host, MARKER, 10.0).unwrap(), None);
    let marker = link.remote.get::<Marker>(MARKER).unwrap().object();
    assert_eq!(marker.label, "camp");
}

#[test]
fn update_rate_holds_back_changes() {
    let (mut host, mut link) = marker_host();
    link.spawn(&mut host, MARKER, 0.0).unwrap();

    host.get_mut::<Marker>(MARKER).unwrap().object_mut().position = Vector2::new(5.0, 5.0);

    assert_eq!(link.update(&mut host, MARKER, 0.2).unwrap(), None);
    let changed = link.update(&mut host, MARKER, 0.6).unwrap().unwrap();
    assert_eq!(changed.bits(), 0b10);
    assert_eq!(
        link.remote.get::<Marker>(MARKER).unwrap().object().position,
        Vector2::new(5.0, 5.0)
    );

    // the window restarts at the last send
    host.get_mut::<Marker>(MARKER).unwrap().object_mut().position = Vector2::new(6.0, 6.0);
    assert_eq!(link.update(&mut host, MARKER, 0.9).unwrap(), None);
    assert!(link.update(&mut host, MARKER, 1.2).unwrap().is_some());
}

#[test]
fn list_shrinking_to_empty_notifies() {
    init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();
    let bag = Inventory {
        items: vec![3, 1, 4],
        item_notifies: 0,
    };
    host.insert(Box::new(protocol.replicate(bag, BAG))).unwrap();
    let mut link = TestLink::new(&protocol, 1, true);

    link.spawn(&mut host, BAG, 0.0).unwrap();
    assert_eq!(
        link.remote.get::<Inventory>(BAG).unwrap().object().item_notifies,
        1
    );

    host.get_mut::<Inventory>(BAG).unwrap().object_mut().items.clear();
    let changed = link.update(&mut host, BAG, 1.0).unwrap().unwrap();

    assert_eq!(changed.bits(), 0b1);
    let bag = link.remote.get::<Inventory>(BAG).unwrap().object();
    assert!(bag.items.is_empty());
    assert_eq!(bag.item_notifies, 2);
}

#[test]
fn empty_list_on_spawn_still_notifies() {
    init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();
    host.insert(Box::new(protocol.replicate(Inventory::default(), BAG)))
        .unwrap();
    let mut link = TestLink::new(&protocol, 1, true);

    let sent = link.spawn(&mut host, BAG, 0.0).unwrap();

    assert_eq!(sent.bits(), 0b1);
    assert_eq!(
        link.remote.get::<Inventory>(BAG).unwrap().object().item_notifies,
        1
    );
}

#[test]
fn batch_sync_carries_only_changed_objects() {
    init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();
    for id in 1..=3 {
        host.insert(Box::new(protocol.replicate(Avatar::new(10, "x"), NetId::new(id))))
            .unwrap();
    }
    let mut link = TestLink::new(&protocol, 1, false);
    for id in 1..=3 {
        link.spawn(&mut host, NetId::new(id), 0.0).unwrap();
    }

    host.get_mut::<Avatar>(NetId::new(2)).unwrap().object_mut().health = 5;
    // owner-only, invisible to this connection
    host.get_mut::<Avatar>(NetId::new(3)).unwrap().object_mut().owner_secret = "y".to_string();

    let applied = link.sync(&mut host, 1.0).unwrap();

    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].0, NetId::new(2));
    assert_eq!(applied[0].1.bits(), 0b01);
    assert_eq!(
        link.remote.get::<Avatar>(NetId::new(2)).unwrap().object().health,
        5
    );
    assert!(link.sync(&mut host, 2.0).unwrap().is_empty());
}

#[test]
fn paused_object_is_left_out_of_batches() {
    init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();
    host.insert(Box::new(protocol.replicate(Avatar::new(10, "x"), NetId::new(1))))
        .unwrap();
    let mut link = TestLink::new(&protocol, 1, false);
    link.spawn(&mut host, NetId::new(1), 0.0).unwrap();

    host.get_mut::<Avatar>(NetId::new(1)).unwrap().object_mut().health = 1;
    host.get_mut::<Avatar>(NetId::new(1)).unwrap().set_replicates(false);
    assert!(link.sync(&mut host, 1.0).unwrap().is_empty());

    host.get_mut::<Avatar>(NetId::new(1)).unwrap().set_replicates(true);
    assert_eq!(link.sync(&mut host, 2.0).unwrap().len(), 1);
}

#[test]
fn removed_connection_starts_over() {
    let (mut host, mut link) = marker_host();
    link.spawn(&mut host, MARKER, 0.0).unwrap();
    assert!(host.replica(MARKER).unwrap().has_connection(link.connection));

    host.remove_connection(link.connection);

    assert!(!host.replica(MARKER).unwrap().has_connection(link.connection));
    assert!(link.sync(&mut host, 1.0).unwrap().is_empty());

    // a fresh remote gets the initial state again, label included
    let protocol = protocol();
    let mut fresh = TestLink::new(&protocol, 1, false);
    let sent = fresh.spawn(&mut host, MARKER, 2.0).unwrap();
    assert_eq!(sent.bits(), 0b11);
    assert_eq!(
        fresh.remote.get::<Marker>(MARKER).unwrap().object().label,
        "camp"
    );
}
