/// Class ids on the wire and construction of the right concrete class on
/// each side
use statecast_shared::{
    ClassId, ClassIdentityError, ClassLineage, ConfigError, FieldTable, HostType, NetId, Protocol,
    ProtocolError, ReplicaHost, Replicate,
};
use statecast_test::{protocol, Avatar, ClientHero, ServerHero, TestLink};

#[test]
fn class_id_is_stable_within_a_run() {
    let first = protocol();
    let second = protocol();

    assert_eq!(first.class_id::<Avatar>(), first.class_id::<Avatar>());
    assert_eq!(first.class_id::<Avatar>(), second.class_id::<Avatar>());
    assert_eq!(first.class_id::<Avatar>(), ClassId::from_name("Game.Avatar"));
}

#[test]
fn hero_variants_share_their_ancestor_id() {
    let protocol = protocol();

    let server = protocol.class_id::<ServerHero>();
    let client = protocol.class_id::<ClientHero>();

    assert_eq!(server, client);
    assert_eq!(server, ClassId::from_name("Game.Hero"));
    assert_ne!(server, protocol.class_id::<Avatar>());
}

#[test]
fn factories_split_hero_by_role() {
    let protocol = protocol();
    let hero = protocol.class_id::<ServerHero>();

    let server = protocol.build_factory(HostType::Server);
    let client = protocol.build_factory(HostType::Client);

    assert_eq!(server.class_name(hero), Some("Game.ServerHero"));
    assert_eq!(client.class_name(hero), Some("Game.ClientHero"));
    assert_eq!(server.len(), client.len());
}

#[test]
fn server_hero_spawns_as_client_hero() {
    let _ = env_logger::builder().is_test(true).try_init();
    let protocol = protocol();
    let hero_id = NetId::new(42);

    let mut host = ReplicaHost::new();
    let hero = ServerHero {
        level: 12,
        title: "Warden".to_string(),
        experience: 90_000,
    };
    host.insert(Box::new(protocol.replicate(hero, hero_id))).unwrap();
    let mut link = TestLink::new(&protocol, 1, false);

    link.spawn(&mut host, hero_id, 0.0).unwrap();

    assert!(link.remote.get::<ServerHero>(hero_id).is_none());
    let hero = link.remote.get::<ClientHero>(hero_id).unwrap().object();
    assert_eq!(hero.level, 12);
    assert_eq!(hero.title, "Warden");
    // notify ran after both fields were applied
    assert_eq!(hero.banner, "Warden (level 12)");

    host.get_mut::<ServerHero>(hero_id).unwrap().object_mut().level = 13;
    host.get_mut::<ServerHero>(hero_id).unwrap().object_mut().title = "Marshal".to_string();
    link.update(&mut host, hero_id, 1.0).unwrap();

    let hero = link.remote.get::<ClientHero>(hero_id).unwrap().object();
    assert_eq!(hero.banner, "Marshal (level 13)");
}

#[derive(Default)]
struct Lonely;

impl ClassLineage for Lonely {
    const CLASS_NAME: &'static str = "Game.Lonely";
    const CLIENT_CLASS: &'static str = "Game.Stranger";
}

impl Replicate for Lonely {
    fn field_table() -> Result<FieldTable<Self>, ConfigError> {
        FieldTable::builder().build()
    }
}

#[test]
fn unrelated_counterpart_fails_at_lock() {
    let mut protocol = Protocol::builder();
    protocol.add_class::<Lonely>();
    protocol.declare_class("Game.Stranger", None);

    let result = protocol.try_lock();

    assert!(matches!(
        result,
        Err(ProtocolError::ClassIdentity(
            ClassIdentityError::IncompatibleReplicatedClassHierarchy { .. }
        ))
    ));
    assert!(!protocol.is_locked());
}
