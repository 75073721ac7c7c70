#![cfg(feature = "macros")]

use std::{cell::RefCell, rc::Rc};
use typed_target::{Event, EventMap, EventState, MapVariant, NamedEvent, TypedEventTarget};

// ============================================================================
// Test: derive(Event)
// ============================================================================

#[derive(Debug, Default, Event)]
struct UserLogin {
    user: String,
    state: EventState,
}

#[derive(Debug, Default, Event)]
#[event(name = "logout", cancelable)]
struct UserLogout {
    user: String,
    #[event(state)]
    flags: EventState,
}

#[derive(Debug, Default, Event)]
struct Tick(u64, EventState);

#[test]
fn test_derive_event_names() {
    assert_eq!(UserLogin::TYPE, "user-login");
    assert_eq!(UserLogout::TYPE, "logout");
    assert_eq!(Tick::TYPE, "tick");

    let login = UserLogin::default();
    assert_eq!(login.event_type(), "user-login");
    assert!(!login.cancelable());
}

#[test]
fn test_derive_event_cancelable() {
    let logout = UserLogout::default();
    assert!(logout.cancelable());
    logout.prevent_default();
    assert!(logout.default_prevented());
    assert!(logout.flags.contains(typed_target::EventFlags::CANCELED));
}

#[test]
fn test_derived_event_on_target() {
    let target = TypedEventTarget::<UserLogin>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    target.on_event::<UserLogin>(move |event| s.borrow_mut().push(event.user.clone()));

    target
        .emit(&UserLogin {
            user: "ada".into(),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["ada".to_string()]);
}

// ============================================================================
// Test: derive(EventMap)
// ============================================================================

#[derive(Debug, EventMap)]
enum Session {
    Login(UserLogin),
    Logout(UserLogout),
    Tick(Tick),
}

#[test]
fn test_event_map_delegates() {
    let event = Session::from(UserLogout::default());
    assert_eq!(event.event_type(), "logout");
    assert!(event.cancelable());

    let tick: Session = Tick(3, EventState::new()).into();
    assert_eq!(tick.event_type(), "tick");
    assert_eq!(Tick::project(&tick).map(|t| t.0), Some(3));
    assert!(UserLogin::project(&tick).is_none());
}

#[test]
fn test_typed_listeners_on_map() {
    let target = TypedEventTarget::<Session>::new();
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    target.on_event::<UserLogin>(move |e| l.borrow_mut().push(format!("in:{}", e.user)));
    let l = Rc::clone(&log);
    let out = target.on_event::<UserLogout>(move |e| {
        l.borrow_mut().push(format!("out:{}", e.user));
        e.prevent_default();
    });
    let l = Rc::clone(&log);
    target.once_event::<Tick>(move |t| l.borrow_mut().push(format!("tick:{}", t.0)));

    let login = Session::from(UserLogin {
        user: "ada".into(),
        ..Default::default()
    });
    let logout = Session::from(UserLogout {
        user: "ada".into(),
        ..Default::default()
    });
    assert_eq!(target.emit(&login), Ok(true));
    assert_eq!(target.emit(&logout), Ok(false));
    target.emit(&Session::from(Tick(1, EventState::new()))).unwrap();
    target.emit(&Session::from(Tick(2, EventState::new()))).unwrap();

    assert_eq!(*log.borrow(), vec!["in:ada", "out:ada", "tick:1"]);

    // The once tick listener is gone.
    assert_eq!(
        target.listeners().types().collect::<Vec<_>>(),
        vec!["user-login", "logout"]
    );

    target.off(UserLogout::TYPE, &out);
    assert!(target.listeners_for("logout").is_empty());
}

#[test]
fn test_map_mute_by_variant_name() {
    let target = TypedEventTarget::<Session>::new();
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    target.on_event::<Tick>(move |_| *h.borrow_mut() += 1);

    target.mute(Tick::TYPE);
    target.emit(&Tick(0, EventState::new()).into()).unwrap();
    assert_eq!(*hits.borrow(), 0);

    target.unmute(Tick::TYPE);
    target.emit(&Tick(0, EventState::new()).into()).unwrap();
    assert_eq!(*hits.borrow(), 1);
}
