/// Object references that arrive before, or after, the object they point at
use statecast_shared::{NetId, ObjectRef, Replica, ReplicaHost};
use statecast_test::{protocol, Avatar, TestLink, Tether};

const TETHER: NetId = NetId::new(10);
const LEADER: NetId = NetId::new(11);
const SCOUT: NetId = NetId::new(12);

fn setup() -> (ReplicaHost, TestLink) {
    let _ = env_logger::builder().is_test(true).try_init();
    let protocol = protocol();
    let mut host = ReplicaHost::new();

    let tether = Tether {
        anchor: ObjectRef::new(LEADER),
        followers: vec![ObjectRef::new(LEADER), ObjectRef::new(SCOUT)],
        ..Default::default()
    };
    host.insert(Box::new(protocol.replicate(tether, TETHER))).unwrap();
    host.insert(Box::new(protocol.replicate(Avatar::new(100, "a"), LEADER)))
        .unwrap();
    host.insert(Box::new(protocol.replicate(Avatar::new(50, "b"), SCOUT)))
        .unwrap();

    (host, TestLink::new(&protocol, 1, false))
}

#[test]
fn reference_to_known_object_resolves_immediately() {
    let (mut host, mut link) = setup();
    link.spawn(&mut host, LEADER, 0.0).unwrap();
    link.spawn(&mut host, TETHER, 0.0).unwrap();

    let leader_key = link.remote.key(LEADER);
    let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
    assert_eq!(tether.anchor.key(), leader_key);
    assert_eq!(tether.followers[0].key(), leader_key);
    assert!(tether.followers[1].is_waiting());
    assert!(link.remote.replica(TETHER).unwrap().waits_on(SCOUT));
    assert!(!link.remote.replica(TETHER).unwrap().waits_on(LEADER));
}

#[test]
fn reference_resolves_when_target_spawns_later() {
    let (mut host, mut link) = setup();
    link.spawn(&mut host, TETHER, 0.0).unwrap();

    {
        let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
        assert_eq!(tether.anchor.net_id(), Some(LEADER));
        assert!(tether.anchor.is_waiting());
        assert_eq!(tether.anchor_notifies, 1);
        assert_eq!(tether.follower_notifies, 1);
    }

    link.spawn(&mut host, LEADER, 0.0).unwrap();

    let leader_key = link.remote.key(LEADER);
    assert!(leader_key.is_some());
    let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
    assert_eq!(tether.anchor.key(), leader_key);
    assert_eq!(tether.followers[0].key(), leader_key);
    assert!(tether.followers[1].is_waiting());
    // each patched field notifies once more
    assert_eq!(tether.anchor_notifies, 2);
    assert_eq!(tether.follower_notifies, 2);

    link.spawn(&mut host, SCOUT, 0.0).unwrap();

    let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
    assert_eq!(tether.followers[1].key(), link.remote.key(SCOUT));
    assert_eq!(tether.anchor_notifies, 2);
    assert_eq!(tether.follower_notifies, 3);
    assert!(!link.remote.replica(TETHER).unwrap().waits_on(SCOUT));
}

#[test]
fn retargeted_reference_drops_stale_wait() {
    let (mut host, mut link) = setup();
    link.spawn(&mut host, TETHER, 0.0).unwrap();
    assert!(link.remote.replica(TETHER).unwrap().waits_on(SCOUT));

    host.get_mut::<Tether>(TETHER)
        .unwrap()
        .object_mut()
        .followers
        .truncate(1);
    link.update(&mut host, TETHER, 1.0).unwrap();

    assert!(!link.remote.replica(TETHER).unwrap().waits_on(SCOUT));
    assert!(link.remote.replica(TETHER).unwrap().waits_on(LEADER));

    link.spawn(&mut host, SCOUT, 0.0).unwrap();
    let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
    assert_eq!(tether.followers.len(), 1);
    assert_eq!(tether.follower_notifies, 2);
}

#[test]
fn despawned_target_is_still_named_by_reference() {
    let (mut host, mut link) = setup();
    link.spawn(&mut host, LEADER, 0.0).unwrap();
    link.spawn(&mut host, TETHER, 0.0).unwrap();
    assert!(link.remote.replica(TETHER).unwrap().references(LEADER));

    link.despawn(&mut host, LEADER).unwrap();

    let tether = link.remote.get::<Tether>(TETHER).unwrap().object();
    assert_eq!(tether.anchor.net_id(), Some(LEADER));
}
