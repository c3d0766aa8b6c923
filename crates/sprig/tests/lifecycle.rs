//! Lifecycle tests
//!
//! Single-instance identity, exactly-once teardown across every removal
//! trigger, transient-move suppression, subtree completeness, token
//! revocation and the ready gate.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use sprig::{BindOptions, Dom, Error, Handle, NodeId};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build a connected element under body and wrap it
fn connected_element(dom: &mut Dom, tag: &str) -> (Handle, NodeId) {
    let body = dom.document().body().expect("structure exists");
    let node = dom.document_mut().tree_mut().create_element(tag);
    dom.document_mut()
        .tree_mut()
        .append_child(body, node)
        .unwrap();
    let handle = dom.resolve(node).unwrap();
    (handle, node)
}

#[test]
fn test_resolve_is_single_instance() {
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "div");

    assert_eq!(dom.resolve(node).unwrap(), handle);
    assert_eq!(dom.resolve(node).unwrap(), handle);
}

#[test]
fn test_resolve_after_destroy_yields_fresh_handle() {
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "div");

    dom.destroy(handle).unwrap();
    // Re-insert the element and wrap it again within the same turn.
    let body = dom.document().body().unwrap();
    dom.document_mut()
        .tree_mut()
        .append_child(body, node)
        .unwrap();
    let fresh = dom.resolve(node).unwrap();
    assert_ne!(fresh, handle);

    // The deferred check sees a reconnected element and keeps the fresh
    // handle alive.
    dom.flush();
    assert!(dom.at(fresh).is_live());
    assert!(!dom.at(handle).is_live());
}

#[test]
fn test_destroy_twice_is_a_lifecycle_error() {
    let mut dom = Dom::new();
    let (handle, _) = connected_element(&mut dom, "div");
    let fired = Rc::new(Cell::new(0));
    {
        let fired = Rc::clone(&fired);
        dom.at(handle)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    dom.destroy(handle).unwrap();
    assert!(matches!(dom.destroy(handle), Err(Error::Removed)));
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_hook_fires_once_on_explicit_destroy() {
    let mut dom = Dom::new();
    let (handle, _) = connected_element(&mut dom, "div");
    let fired = Rc::new(Cell::new(0));
    {
        let fired = Rc::clone(&fired);
        dom.at(handle)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    dom.destroy(handle).unwrap();
    assert_eq!(fired.get(), 1);

    // The pending mutation record must not re-trigger teardown.
    dom.flush();
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_hook_fires_once_on_external_removal() {
    init_tracing();
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "div");
    let fired = Rc::new(Cell::new(0));
    {
        let fired = Rc::clone(&fired);
        dom.at(handle)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    // Out-of-band removal: straight through the tree, not the library.
    dom.document_mut().tree_mut().detach(node).unwrap();
    assert_eq!(fired.get(), 0);

    dom.flush();
    assert_eq!(fired.get(), 1);
    assert!(!dom.at(handle).is_live());

    dom.flush();
    assert_eq!(fired.get(), 1);
}

#[test]
fn test_hook_fires_once_on_ancestor_removal() {
    let mut dom = Dom::new();
    let (parent, parent_node) = connected_element(&mut dom, "section");
    let child_node = dom.document_mut().tree_mut().create_element("p");
    dom.document_mut()
        .tree_mut()
        .append_child(parent_node, child_node)
        .unwrap();
    let child = dom.resolve(child_node).unwrap();

    let fired = Rc::new(Cell::new(0));
    {
        let fired = Rc::clone(&fired);
        dom.at(child)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    dom.document_mut().tree_mut().detach(parent_node).unwrap();
    dom.flush();

    assert_eq!(fired.get(), 1);
    assert!(!dom.at(child).is_live());
    assert!(!dom.at(parent).is_live());
}

#[test]
fn test_transient_move_is_not_a_removal() {
    let mut dom = Dom::new();
    let (_list, list_node) = connected_element(&mut dom, "ul");
    let item_node = dom.document_mut().tree_mut().create_element("li");
    dom.document_mut()
        .tree_mut()
        .append_child(list_node, item_node)
        .unwrap();
    let item = dom.resolve(item_node).unwrap();

    let fired = Rc::new(Cell::new(0));
    {
        let fired = Rc::clone(&fired);
        dom.at(item)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    // Move: re-append directly under body within the same turn.
    let body = dom.document().body().unwrap();
    dom.document_mut()
        .tree_mut()
        .append_child(body, item_node)
        .unwrap();
    dom.flush();

    assert_eq!(fired.get(), 0);
    assert!(dom.at(item).is_live());
    // Still fully usable.
    dom.at(item).add_class("moved").unwrap();
    assert!(dom.at(item).has_class("moved").unwrap());
}

#[test]
fn test_removing_an_ancestor_tears_down_the_whole_subtree() {
    let mut dom = Dom::new();
    let (root, root_node) = connected_element(&mut dom, "div");
    let fired = Rc::new(Cell::new(0));

    let mut handles = vec![root];
    let mut parent = root_node;
    for tag in ["section", "ul", "li"] {
        let node = dom.document_mut().tree_mut().create_element(tag);
        dom.document_mut()
            .tree_mut()
            .append_child(parent, node)
            .unwrap();
        handles.push(dom.resolve(node).unwrap());
        parent = node;
    }
    for &handle in &handles {
        let fired = Rc::clone(&fired);
        dom.at(handle)
            .on_detach(move |_, _| fired.set(fired.get() + 1))
            .unwrap();
    }

    dom.document_mut().tree_mut().detach(root_node).unwrap();
    dom.flush();

    assert_eq!(fired.get(), handles.len());
    for &handle in &handles {
        assert!(!dom.at(handle).is_live());
    }
}

#[test]
fn test_teardown_revokes_every_listener_at_once() {
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "button");
    let clicks = Rc::new(Cell::new(0));
    let keys = Rc::new(Cell::new(0));
    {
        let clicks = Rc::clone(&clicks);
        dom.at(handle)
            .on(
                &["click"],
                move |_, _, _| clicks.set(clicks.get() + 1),
                BindOptions::default(),
            )
            .unwrap();
    }
    {
        let keys = Rc::clone(&keys);
        dom.at(handle)
            .on(
                &["keydown", "keyup"],
                move |_, _, _| keys.set(keys.get() + 1),
                BindOptions::default(),
            )
            .unwrap();
    }

    dom.dispatch(node, "click");
    dom.dispatch(node, "keyup");
    assert_eq!((clicks.get(), keys.get()), (1, 1));

    dom.destroy(handle).unwrap();

    // Native dispatch on the detached element reaches nothing.
    dom.dispatch(node, "click");
    dom.dispatch(node, "keydown");
    dom.dispatch(node, "keyup");
    assert_eq!((clicks.get(), keys.get()), (1, 1));
}

#[test]
fn test_ready_queue_runs_in_fifo_order() {
    let mut dom = Dom::bare();
    assert!(!dom.is_ready());

    let order = Rc::new(RefCell::new(Vec::new()));
    for n in 1..=3 {
        let order = Rc::clone(&order);
        dom.once_ready(move |_| order.borrow_mut().push(n));
    }
    assert!(order.borrow().is_empty());

    dom.ensure_structure();
    assert!(dom.is_ready());
    assert_eq!(*order.borrow(), vec![1, 2, 3]);

    // After the transition, callbacks run immediately.
    let order2 = Rc::clone(&order);
    dom.once_ready(move |_| order2.borrow_mut().push(4));
    assert_eq!(*order.borrow(), vec![1, 2, 3, 4]);
}

#[test]
fn test_once_ready_during_flush_runs_immediately() {
    let mut dom = Dom::bare();
    let order = Rc::new(RefCell::new(Vec::new()));
    {
        let order = Rc::clone(&order);
        dom.once_ready(move |dom| {
            order.borrow_mut().push(1);
            let order = Rc::clone(&order);
            dom.once_ready(move |_| order.borrow_mut().push(2));
        });
    }
    {
        let order = Rc::clone(&order);
        dom.once_ready(move |_| order.borrow_mut().push(3));
    }

    dom.ensure_structure();
    assert_eq!(*order.borrow(), vec![1, 2, 3]);
}

#[test]
fn test_start_is_deferred_until_structure_exists() {
    let mut dom = Dom::bare();
    let handle = dom.create("div");

    // Event binding is gated on readiness.
    let err = dom
        .at(handle)
        .on(&["click"], |_, _, _| {}, BindOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotReady));

    dom.ensure_structure();
    // Still detached, so the connectivity precondition takes over.
    let err = dom
        .at(handle)
        .on(&["click"], |_, _, _| {}, BindOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotConnected));
}

#[test]
fn test_hook_can_rewrap_the_element_fresh() {
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "div");
    let rewrapped = Rc::new(Cell::new(None));
    {
        let rewrapped = Rc::clone(&rewrapped);
        dom.at(handle)
            .on_detach(move |dom, old| {
                // The registry entry is gone before hooks run, so this is
                // a brand-new handle for the (detached) element.
                let fresh = dom.resolve(node).unwrap();
                assert_ne!(fresh, old);
                rewrapped.set(Some(fresh));
            })
            .unwrap();
    }

    dom.destroy(handle).unwrap();
    let fresh = rewrapped.get().expect("hook ran");
    assert!(dom.at(fresh).is_live());
    assert!(!dom.at(handle).is_live());
}

#[test]
fn test_operations_on_destroyed_handle_fail_fast() {
    let mut dom = Dom::new();
    let (handle, _) = connected_element(&mut dom, "div");
    dom.destroy(handle).unwrap();

    assert!(matches!(
        dom.at(handle).add_class("x"),
        Err(Error::Removed)
    ));
    assert!(matches!(dom.at(handle).attr("id"), Err(Error::Removed)));
    assert!(matches!(dom.at(handle).text(), Err(Error::Removed)));
    assert!(matches!(
        dom.at(handle).on(&["click"], |_, _, _| {}, BindOptions::default()),
        Err(Error::Removed)
    ));
    assert!(matches!(
        dom.at(handle).get_data("k"),
        Err(Error::Removed)
    ));
}

#[test]
fn test_click_bind_unbind_destroy_scenario() {
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "a");
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let id1 = {
        let first = Rc::clone(&first);
        dom.at(handle)
            .on(
                &["click"],
                move |_, _, _| first.set(first.get() + 1),
                BindOptions::default(),
            )
            .unwrap()
    };
    {
        let second = Rc::clone(&second);
        dom.at(handle)
            .on(
                &["click"],
                move |_, _, _| second.set(second.get() + 1),
                BindOptions::default(),
            )
            .unwrap();
    }

    dom.dispatch(node, "click");
    assert_eq!((first.get(), second.get()), (1, 1));

    dom.at(handle).off("click", id1).unwrap();
    dom.dispatch(node, "click");
    assert_eq!((first.get(), second.get()), (1, 2));

    dom.at(handle).destroy().unwrap();
    dom.dispatch(node, "click");
    assert_eq!((first.get(), second.get()), (1, 2));

    assert!(matches!(
        dom.at(handle).on(&["click"], |_, _, _| {}, BindOptions::default()),
        Err(Error::Removed)
    ));
}

#[test]
fn test_content_replacement_fires_the_detach_hook() {
    init_tracing();
    let mut dom = Dom::new();
    let list = dom.resolve_markup("<ul><li>A</li></ul>").unwrap();
    let body = dom.document().body().unwrap();
    let root = dom.resolve(body).unwrap();
    dom.at(root).append(list).unwrap();

    let item = dom.at(list).find("li").unwrap().first().unwrap();
    let fired = Rc::new(Cell::new(0));
    let seen = Rc::new(Cell::new(None));
    {
        let fired = Rc::clone(&fired);
        let seen = Rc::clone(&seen);
        dom.at(item)
            .on_detach(move |_, handle| {
                fired.set(fired.get() + 1);
                seen.set(Some(handle));
            })
            .unwrap();
    }

    dom.at(list).set_html("<li>B</li>").unwrap();
    dom.flush();

    assert_eq!(fired.get(), 1);
    assert_eq!(seen.get(), Some(item));
    assert!(!dom.at(item).is_live());
    assert!(dom.at(list).is_live());
    assert_eq!(dom.at(list).text().unwrap(), "B");
}

#[test]
fn test_destruction_order_within_one_handle() {
    // Data and listeners are gone before the hook observes the handle.
    let mut dom = Dom::new();
    let (handle, node) = connected_element(&mut dom, "div");
    dom.at(handle)
        .set_data("k", sprig::Value::from(1))
        .unwrap();
    let clicks = Rc::new(Cell::new(0));
    {
        let clicks = Rc::clone(&clicks);
        dom.at(handle)
            .on(
                &["click"],
                move |_, _, _| clicks.set(clicks.get() + 1),
                BindOptions::default(),
            )
            .unwrap();
    }

    let observed = Rc::new(Cell::new(false));
    {
        let observed = Rc::clone(&observed);
        let clicks = Rc::clone(&clicks);
        dom.at(handle)
            .on_detach(move |dom, _| {
                // Listeners were revoked in step two; dispatch is inert.
                dom.dispatch(node, "click");
                assert_eq!(clicks.get(), 0);
                observed.set(true);
            })
            .unwrap();
    }

    dom.destroy(handle).unwrap();
    assert!(observed.get());
}
