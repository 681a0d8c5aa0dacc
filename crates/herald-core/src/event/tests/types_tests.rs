use crate::event::{Event, Stoppable, StoppableEvent};

#[derive(Debug, PartialEq)]
struct OrderCreated {
    id: u64,
}

impl Event for OrderCreated {}

#[test]
fn test_stoppable_event_wraps_payload() {
    let mut event = StoppableEvent::new(OrderCreated { id: 7 });
    assert_eq!(event.payload().id, 7);
    assert_eq!(event.id, 7); // Deref

    event.payload_mut().id = 8;
    assert!(!event.is_propagation_stopped());
    event.stop_propagation();
    assert!(event.is_propagation_stopped());
    assert_eq!(event.into_inner(), OrderCreated { id: 8 });
}

#[test]
fn test_stoppable_event_through_dyn_event() {
    let mut event = StoppableEvent::new(String::from("payload"));
    let dyn_event: &mut dyn Event = &mut event;

    assert!(dyn_event.is_stoppable());
    assert!(!dyn_event.is_propagation_stopped());
    assert!(dyn_event.stop_propagation());
    assert!(dyn_event.is_propagation_stopped());
    assert!(dyn_event.is::<StoppableEvent<String>>());
    assert_eq!(
        dyn_event
            .downcast_ref::<StoppableEvent<String>>()
            .map(|e| e.payload().as_str()),
        Some("payload")
    );
}

#[test]
fn test_plain_events_are_not_stoppable() {
    let mut plain = OrderCreated { id: 1 };
    let dyn_event: &mut dyn Event = &mut plain;

    assert!(!dyn_event.is_stoppable());
    assert!(!dyn_event.stop_propagation());
    assert!(!dyn_event.is_propagation_stopped());
    assert!(dyn_event.downcast_mut::<OrderCreated>().is_some());
    assert!(dyn_event.downcast_ref::<String>().is_none());
}

#[test]
fn test_builtin_plain_payloads() {
    let mut values: Vec<Box<dyn Event>> = vec![
        Box::new(()),
        Box::new(true),
        Box::new(42i32),
        Box::new(3.5f64),
        Box::new("static"),
        Box::new(String::from("owned")),
        Box::new(serde_json::json!({ "id": 1 })),
        Box::new(vec![1u8, 2, 3]),
    ];
    for value in values.iter_mut() {
        assert!(!value.is_stoppable());
        assert!(!value.stop_propagation());
    }
}

#[test]
fn test_custom_stoppable_event() {
    #[derive(Debug, Default)]
    struct Shutdown {
        vetoed: bool,
    }
    impl Stoppable for Shutdown {
        fn is_propagation_stopped(&self) -> bool {
            self.vetoed
        }
        fn stop_propagation(&mut self) {
            self.vetoed = true;
        }
    }
    impl Event for Shutdown {
        fn as_stoppable(&self) -> Option<&dyn Stoppable> {
            Some(self)
        }
        fn as_stoppable_mut(&mut self) -> Option<&mut dyn Stoppable> {
            Some(self)
        }
    }

    let mut shutdown = Shutdown::default();
    let dyn_event: &mut dyn Event = &mut shutdown;
    assert!(dyn_event.is_stoppable());
    assert!(dyn_event.stop_propagation());
    assert!(shutdown.vetoed);
}
