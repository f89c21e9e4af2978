//! Cross-crate canvas flows: adds, events, z-order, and view transforms.

use ib_canvas::{
    Canvas, CanvasError, CanvasEvent, Dimensions, Element, ElementId, ElementKind, EventBus,
    EventKind, Zoom, ZoomCenter,
};
use kurbo::{Point, Rect, Vec2};
use std::cell::RefCell;
use std::rc::Rc;

const EPSILON: f64 = 1e-6;

fn canvas() -> Canvas {
    Canvas::new(Dimensions::new(600.0, 400.0))
}

fn recording_canvas() -> (Canvas, Rc<RefCell<Vec<CanvasEvent>>>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut bus = EventBus::new();
    bus.on_any(move |ev| sink.borrow_mut().push(ev.clone()));
    (Canvas::with_event_bus(Dimensions::new(600.0, 400.0), bus), events)
}

fn shape(name: &str, x: f64, y: f64, w: f64, h: f64) -> Element {
    Element::shape(ElementId::intern(name), x, y, w, h)
}

#[test]
fn init_event_carries_root() {
    let (canvas, events) = recording_canvas();
    match events.borrow().first() {
        Some(CanvasEvent::CanvasInit { root }) => assert_eq!(*root, canvas.root().unwrap()),
        other => panic!("expected CanvasInit first, got {other:?}"),
    }
}

#[test]
fn added_shape_gets_graphics_and_exactly_one_event() {
    let (mut canvas, events) = recording_canvas();
    let element = shape("flow_s1", 10.0, 10.0, 100.0, 80.0);
    canvas.add_shape(element.clone()).unwrap();

    let gfx = canvas.graphics_of(element.id).unwrap().expect("graphics");

    let added: Vec<_> = events
        .borrow()
        .iter()
        .filter(|e| e.kind() == EventKind::ShapeAdded)
        .cloned()
        .collect();
    assert_eq!(added.len(), 1);
    match &added[0] {
        CanvasEvent::ShapeAdded {
            element: fired,
            gfx: fired_gfx,
        } => {
            assert_eq!(fired, &element);
            assert_eq!(*fired_gfx, gfx);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn duplicate_id_has_no_partial_side_effects() {
    let (mut canvas, events) = recording_canvas();
    canvas.add_shape(shape("flow_dup", 0.0, 0.0, 10.0, 10.0)).unwrap();

    let root = canvas.root().unwrap();
    let events_before = events.borrow().len();
    let children_before = canvas.paper().unwrap().children(root).len();

    let err = canvas
        .add_shape(shape("flow_dup", 5.0, 5.0, 10.0, 10.0))
        .unwrap_err();
    assert_eq!(err, CanvasError::DuplicateId(ElementId::intern("flow_dup")));
    assert_eq!(events.borrow().len(), events_before);
    assert_eq!(canvas.paper().unwrap().children(root).len(), children_before);
}

#[test]
fn outer_rect_viewbox_roundtrips_to_scale_one() {
    let mut canvas = canvas();
    canvas.add_shape(shape("flow_vb", 0.0, 0.0, 300.0, 300.0)).unwrap();

    let outer = canvas.size().unwrap();
    canvas
        .set_viewbox(Rect::new(0.0, 0.0, outer.width, outer.height))
        .unwrap();

    let vbox = canvas.viewbox().unwrap();
    assert!(vbox.x.abs() < EPSILON);
    assert!(vbox.y.abs() < EPSILON);
    assert_eq!(vbox.scale, 1.0);
    assert!((vbox.width - outer.width).abs() < EPSILON);
    assert!((vbox.height - outer.height).abs() < EPSILON);
}

#[test]
fn zoom_keeps_model_point_under_cursor() {
    let mut canvas = canvas();
    canvas.scroll_by(Vec2::new(-40.0, 25.0)).unwrap();

    let center = Point::new(150.0, 100.0);
    let root = canvas.root().unwrap();
    let before = canvas.paper().unwrap().transform(root);
    let model_point = before.inverse() * center;

    let scale = canvas
        .set_zoom(Zoom::Level(3.0), Some(ZoomCenter::Point(center)))
        .unwrap();
    assert!((scale - 3.0).abs() < EPSILON);

    let after = canvas.paper().unwrap().transform(root);
    let mapped = after * model_point;
    assert!((mapped - center).hypot() < EPSILON);
}

#[test]
fn auto_center_zoom_anchors_at_container_midpoint() {
    let mut canvas = canvas();
    let mid = Point::new(300.0, 200.0);
    let root = canvas.root().unwrap();
    let before = canvas.paper().unwrap().transform(root);

    canvas.set_zoom(Zoom::Level(2.0), Some(ZoomCenter::Auto)).unwrap();

    let after = canvas.paper().unwrap().transform(root);
    let mapped = after * (before.inverse() * mid);
    assert!((mapped - mid).hypot() < EPSILON);
}

#[test]
fn fit_viewport_shrinks_but_never_enlarges() {
    let mut wide = canvas();
    wide.add_shape(shape("flow_fit_wide", 0.0, 0.0, 1200.0, 300.0)).unwrap();
    assert_eq!(wide.set_zoom(Zoom::FitViewport, None).unwrap(), 0.5);

    let mut small = canvas();
    small.add_shape(shape("flow_fit_small", 0.0, 0.0, 100.0, 100.0)).unwrap();
    assert_eq!(small.set_zoom(Zoom::FitViewport, None).unwrap(), 1.0);
}

#[test]
fn scroll_roundtrip_restores_translation() {
    let mut canvas = canvas();
    let origin = canvas.scroll().unwrap();

    canvas.scroll_by(Vec2::new(10.0, 0.0)).unwrap();
    canvas.scroll_by(Vec2::new(-10.0, 0.0)).unwrap();

    let back = canvas.scroll().unwrap();
    assert!((back - origin).hypot() < EPSILON);
}

#[test]
fn send_to_front_places_shape_last_under_root() {
    let mut canvas = canvas();
    canvas
        .add_shape(shape("flow_z_a", 0.0, 0.0, 10.0, 10.0))
        .and_then(|c| c.add_shape(shape("flow_z_b", 5.0, 0.0, 10.0, 10.0)))
        .and_then(|c| c.add_shape(shape("flow_z_c", 10.0, 0.0, 10.0, 10.0)))
        .unwrap();

    let a = ElementId::intern("flow_z_a");
    let root = canvas.root().unwrap();
    let gfx_a = canvas.graphics_of(a).unwrap().unwrap();

    canvas.send_to_front(a, true).unwrap();
    let order = canvas.paper().unwrap().children(root);
    assert_eq!(order.last(), Some(&gfx_a));

    // Idempotent: a second call leaves the sibling order untouched
    canvas.send_to_front(a, true).unwrap();
    assert_eq!(canvas.paper().unwrap().children(root), order);
}

#[test]
fn send_to_front_bubbles_ancestors_and_keeps_child_order() {
    let mut canvas = canvas();
    let p1 = ElementId::intern("flow_z_p1");
    let c1 = ElementId::intern("flow_z_c1");
    let c2 = ElementId::intern("flow_z_c2");

    canvas.add_shape(shape("flow_z_p1", 0.0, 0.0, 200.0, 200.0)).unwrap();
    canvas
        .add_shape(Element::shape(c1, 10.0, 10.0, 20.0, 20.0).with_parent(p1))
        .unwrap();
    canvas
        .add_shape(Element::shape(c2, 40.0, 10.0, 20.0, 20.0).with_parent(p1))
        .unwrap();
    canvas.add_shape(shape("flow_z_p2", 300.0, 0.0, 100.0, 100.0)).unwrap();

    canvas.send_to_front(c1, true).unwrap();

    let paper = canvas.paper().unwrap();
    let root = canvas.root().unwrap();
    let p1_gfx = canvas.graphics_of(p1).unwrap().unwrap();
    let c1_gfx = canvas.graphics_of(c1).unwrap().unwrap();
    let c2_gfx = canvas.graphics_of(c2).unwrap().unwrap();

    // Bubbling moved the parent chain to the top of the root
    assert_eq!(paper.children(root).last(), Some(&p1_gfx));

    // Inside the parent group the target sits above its sibling
    let inner = paper.children(p1_gfx);
    let pos_c1 = inner.iter().position(|&n| n == c1_gfx).unwrap();
    let pos_c2 = inner.iter().position(|&n| n == c2_gfx).unwrap();
    assert!(pos_c1 > pos_c2);
    assert_eq!(inner.last(), Some(&c1_gfx));
}

#[test]
fn send_to_front_without_graphics_is_a_no_op() {
    let mut canvas = canvas();
    canvas.send_to_front(ElementId::intern("flow_z_ghost"), true).unwrap();
}

#[test]
fn absolute_bbox_maps_model_to_container() {
    let mut canvas = canvas();
    let id = ElementId::intern("flow_abs");
    canvas.add_shape(Element::shape(id, 100.0, 50.0, 80.0, 40.0)).unwrap();

    // 300x200 region in a 600x400 container: scale 2, no offset
    canvas.set_viewbox(Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();

    let bbox = canvas.absolute_bbox(id).unwrap().unwrap();
    assert!((bbox.x0 - 200.0).abs() < EPSILON);
    assert!((bbox.y0 - 100.0).abs() < EPSILON);
    assert!((bbox.width() - 160.0).abs() < EPSILON);
    assert!((bbox.height() - 80.0).abs() < EPSILON);
}

#[test]
fn connection_add_and_change_dispatch() {
    let (mut canvas, events) = recording_canvas();
    let id = ElementId::intern("flow_conn");
    canvas
        .add_connection(Element::connection(
            id,
            [Point::new(0.0, 0.0), Point::new(50.0, 50.0)],
        ))
        .unwrap();

    canvas
        .update_element(id, |el| {
            if let ElementKind::Connection { waypoints } = &mut el.kind {
                waypoints.push(Point::new(80.0, 20.0));
            }
        })
        .unwrap();

    let kinds: Vec<_> = events.borrow().iter().map(CanvasEvent::kind).collect();
    assert_eq!(
        kinds
            .iter()
            .filter(|&&k| k == EventKind::ConnectionAdded)
            .count(),
        1
    );
    assert_eq!(
        kinds
            .iter()
            .filter(|&&k| k == EventKind::ConnectionChanged)
            .count(),
        1
    );

    let gfx = canvas.graphics_of(id).unwrap().unwrap();
    let bbox = canvas.paper().unwrap().bbox(gfx).unwrap();
    assert_eq!(bbox, Rect::new(0.0, 0.0, 80.0, 50.0));
}

#[test]
fn view_operations_fire_viewbox_changed() {
    let (mut canvas, events) = recording_canvas();
    canvas.set_viewbox(Rect::new(0.0, 0.0, 600.0, 400.0)).unwrap();
    canvas.scroll_by(Vec2::new(5.0, 5.0)).unwrap();
    canvas.set_zoom(Zoom::Level(1.5), None).unwrap();

    let changed = events
        .borrow()
        .iter()
        .filter(|e| e.kind() == EventKind::ViewboxChanged)
        .count();
    assert_eq!(changed, 3);
}
