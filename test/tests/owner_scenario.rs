/// End-to-end replication of one object to an owning and an observing
/// connection, bytes travelling through `TestLink`
use statecast_shared::{BitArchive, NetId, ReplicaHost};
use statecast_test::{protocol, Avatar, TestLink};

const AVATAR: NetId = NetId::new(1);

fn setup() -> (ReplicaHost, TestLink, TestLink) {
    let _ = env_logger::builder().is_test(true).try_init();

    let protocol = protocol();
    let mut host = ReplicaHost::new();
    host.insert(Box::new(protocol.replicate(Avatar::new(100, "hunter2"), AVATAR)))
        .unwrap();

    let owner = TestLink::new(&protocol, 1, true);
    let observer = TestLink::new(&protocol, 2, false);
    (host, owner, observer)
}

#[test]
fn owner_receives_every_field_on_spawn() {
    let (mut host, mut owner, _observer) = setup();

    let sent = owner.spawn(&mut host, AVATAR, 0.0).unwrap();

    assert_eq!(sent.bits(), 0b11);
    let avatar = owner.remote.get::<Avatar>(AVATAR).unwrap().object();
    assert_eq!(avatar.health, 100);
    assert_eq!(avatar.owner_secret, "hunter2");
}

#[test]
fn observer_never_sees_owner_only_field() {
    let (mut host, _owner, mut observer) = setup();

    let sent = observer.spawn(&mut host, AVATAR, 0.0).unwrap();

    assert_eq!(sent.bits(), 0b01);
    let avatar = observer.remote.get::<Avatar>(AVATAR).unwrap().object();
    assert_eq!(avatar.health, 100);
    assert_eq!(avatar.owner_secret, "");
}

#[test]
fn secret_change_reaches_only_the_owner() {
    let (mut host, mut owner, mut observer) = setup();
    owner.spawn(&mut host, AVATAR, 0.0).unwrap();
    observer.spawn(&mut host, AVATAR, 0.0).unwrap();

    host.get_mut::<Avatar>(AVATAR)
        .unwrap()
        .object_mut()
        .owner_secret = "swordfish".to_string();

    let mut writer = BitArchive::writer();
    let observer_mask = host
        .write_update(AVATAR, observer.connection, &observer.context(1.0), &mut writer)
        .unwrap();
    assert!(observer_mask.is_clear());
    assert!(writer.to_bytes().is_empty());

    let changed = owner.update(&mut host, AVATAR, 1.0).unwrap().unwrap();
    assert_eq!(changed.bits(), 0b10);
    let avatar = owner.remote.get::<Avatar>(AVATAR).unwrap().object();
    assert_eq!(avatar.owner_secret, "swordfish");
    assert_eq!(avatar.health_notifies, 1);
}

#[test]
fn health_change_reaches_both_and_notifies_once() {
    let (mut host, mut owner, mut observer) = setup();
    owner.spawn(&mut host, AVATAR, 0.0).unwrap();
    observer.spawn(&mut host, AVATAR, 0.0).unwrap();

    host.get_mut::<Avatar>(AVATAR).unwrap().object_mut().health = 75;

    for link in [&mut owner, &mut observer] {
        let changed = link.update(&mut host, AVATAR, 1.0).unwrap().unwrap();
        assert_eq!(changed.bits(), 0b01);

        let avatar = link.remote.get::<Avatar>(AVATAR).unwrap().object();
        assert_eq!(avatar.health, 75);
        // once for the spawn, once for this update
        assert_eq!(avatar.health_notifies, 2);
    }
}

#[test]
fn despawn_removes_remote_object() {
    let (mut host, mut owner, _observer) = setup();
    owner.spawn(&mut host, AVATAR, 0.0).unwrap();
    let key = owner.remote.key(AVATAR);
    assert!(key.is_some());

    owner.despawn(&mut host, AVATAR).unwrap();

    assert!(!owner.remote.contains(AVATAR));
    assert_eq!(owner.remote.key(AVATAR), None);
    assert!(host.contains(AVATAR));
}
