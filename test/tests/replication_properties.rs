/// Property tests: a remote copy converges on the host's state after every
/// update, whatever the sequence of edits
use proptest::prelude::*;

use statecast_shared::{NetId, ReplicaHost};
use statecast_test::{protocol, Avatar, Inventory, TestLink};

const ID: NetId = NetId::new(1);

fn edits() -> impl Strategy<Value = Vec<(Option<i32>, Option<String>)>> {
    prop::collection::vec(
        (any::<Option<i32>>(), proptest::option::of("\\PC{0,12}")),
        0..12,
    )
}

proptest! {
    #[test]
    fn owner_copy_tracks_host(health in any::<i32>(), secret in "\\PC{0,12}", steps in edits()) {
        let protocol = protocol();
        let mut host = ReplicaHost::new();
        host.insert(Box::new(protocol.replicate(Avatar::new(health, &secret), ID))).unwrap();
        let mut owner = TestLink::new(&protocol, 1, true);
        owner.spawn(&mut host, ID, 0.0).unwrap();

        for (index, (health, secret)) in steps.into_iter().enumerate() {
            let expected_change = {
                let avatar = host.get_mut::<Avatar>(ID).unwrap().object_mut();
                let mut changed = false;
                if let Some(health) = health {
                    changed |= avatar.health != health;
                    avatar.health = health;
                }
                if let Some(secret) = secret {
                    changed |= avatar.owner_secret != secret;
                    avatar.owner_secret = secret;
                }
                changed
            };

            let received = owner.update(&mut host, ID, index as f64 + 1.0).unwrap();
            prop_assert_eq!(received.is_some(), expected_change);

            let sent = host.get::<Avatar>(ID).unwrap().object();
            let copy = owner.remote.get::<Avatar>(ID).unwrap().object();
            prop_assert_eq!(copy.health, sent.health);
            prop_assert_eq!(&copy.owner_secret, &sent.owner_secret);
        }
    }

    #[test]
    fn observer_never_learns_secret(health in any::<i32>(), steps in edits()) {
        let protocol = protocol();
        let mut host = ReplicaHost::new();
        host.insert(Box::new(protocol.replicate(Avatar::new(health, "secret"), ID))).unwrap();
        let mut observer = TestLink::new(&protocol, 2, false);
        observer.spawn(&mut host, ID, 0.0).unwrap();

        for (index, (health, secret)) in steps.into_iter().enumerate() {
            {
                let avatar = host.get_mut::<Avatar>(ID).unwrap().object_mut();
                if let Some(health) = health {
                    avatar.health = health;
                }
                if let Some(secret) = secret {
                    avatar.owner_secret = secret;
                }
            }
            if let Some(changed) = observer.update(&mut host, ID, index as f64 + 1.0).unwrap() {
                prop_assert_eq!(changed.bits(), 0b01);
            }

            let copy = observer.remote.get::<Avatar>(ID).unwrap().object();
            prop_assert_eq!(copy.health, host.get::<Avatar>(ID).unwrap().object().health);
            prop_assert_eq!(copy.owner_secret.as_str(), "");
        }
    }

    #[test]
    fn list_notifies_once_per_real_change(
        initial in prop::collection::vec(any::<u16>(), 0..8),
        steps in prop::collection::vec(prop::collection::vec(any::<u16>(), 0..8), 0..10),
    ) {
        let protocol = protocol();
        let mut host = ReplicaHost::new();
        let bag = Inventory { items: initial, item_notifies: 0 };
        host.insert(Box::new(protocol.replicate(bag, ID))).unwrap();
        let mut link = TestLink::new(&protocol, 1, true);
        link.spawn(&mut host, ID, 0.0).unwrap();

        let mut expected_notifies = 1;
        for (index, items) in steps.into_iter().enumerate() {
            {
                let bag = host.get_mut::<Inventory>(ID).unwrap().object_mut();
                if bag.items != items {
                    expected_notifies += 1;
                }
                bag.items = items;
            }
            link.update(&mut host, ID, index as f64 + 1.0).unwrap();

            let copy = link.remote.get::<Inventory>(ID).unwrap().object();
            prop_assert_eq!(&copy.items, &host.get::<Inventory>(ID).unwrap().object().items);
            prop_assert_eq!(copy.item_notifies, expected_notifies);
        }
    }
}
