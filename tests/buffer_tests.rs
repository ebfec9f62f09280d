use backbuffer::{BufferError, BufferManager, Color, Point, Rect, Size};

// ============================================================================
// Sizing and Growth Policy Tests
// ============================================================================

#[test]
fn test_initial_size_becomes_capacity() {
    let manager = BufferManager::new(Size::new(100, 100)).unwrap();
    assert_eq!(manager.size().unwrap(), Size::new(100, 100));
    assert_eq!(manager.capacity().unwrap(), Size::new(100, 100));
    assert_eq!(manager.reallocations().unwrap(), 0);
}

#[test]
fn test_fitting_resizes_never_reallocate() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();

    manager.set_size(Size::new(80, 90)).unwrap();
    manager.set_size(Size::new(100, 100)).unwrap();
    manager.set_size(Size::new(1, 1)).unwrap();
    manager.set_size(Size::new(60, 40)).unwrap();

    assert_eq!(manager.size().unwrap(), Size::new(60, 40));
    assert_eq!(
        manager.capacity().unwrap(),
        Size::new(100, 100),
        "shrink/no-op path must keep the existing surface"
    );
    assert_eq!(manager.reallocations().unwrap(), 0);
}

#[test]
fn test_growth_uses_sqrt2_per_axis() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();

    // One pixel over capacity: the factor wins, floor(100 * sqrt2) = 141
    manager.set_size(Size::new(101, 100)).unwrap();
    assert_eq!(manager.capacity().unwrap(), Size::new(141, 141));
    assert_eq!(manager.reallocations().unwrap(), 1);
}

#[test]
fn test_growth_request_beyond_factor_wins() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();

    manager.set_size(Size::new(300, 300)).unwrap();
    let capacity = manager.capacity().unwrap();
    assert!(capacity.width >= 300 && capacity.height >= 300);
    assert_eq!(manager.size().unwrap(), Size::new(300, 300));
}

#[test]
fn test_axes_grow_independently() {
    let mut manager = BufferManager::new(Size::new(100, 50)).unwrap();

    // Only the width exceeds capacity; both axes are recomputed from their
    // own prior capacity, not from a shared scalar
    manager.set_size(Size::new(150, 50)).unwrap();
    let capacity = manager.capacity().unwrap();
    assert_eq!(capacity.width, 150);
    assert_eq!(capacity.height, 70, "floor(50 * sqrt2)");
}

#[test]
fn test_incremental_growth_reallocates_logarithmically() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();

    // Drag the window larger one pixel at a time, 50 times
    for step in 1..=50u32 {
        manager.set_size(Size::new(100 + step, 100 + step)).unwrap();
    }

    let reallocations = manager.reallocations().unwrap();
    assert!(
        reallocations <= 3,
        "50 unit-increment resizes must reallocate O(log n) times, got {reallocations}"
    );
    assert_eq!(manager.size().unwrap(), Size::new(150, 150));
}

#[test]
fn test_zero_area_sizes_rejected_and_state_kept() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();
    manager.set_size(Size::new(64, 64)).unwrap();

    for bad in [Size::new(0, 50), Size::new(50, 0), Size::new(0, 0)] {
        let err = manager.set_size(bad).unwrap_err();
        assert!(matches!(err, BufferError::Configuration(_)), "{bad:?}");
    }

    assert_eq!(manager.size().unwrap(), Size::new(64, 64));
    assert_eq!(manager.capacity().unwrap(), Size::new(100, 100));
    assert_eq!(manager.reallocations().unwrap(), 0);
}

#[test]
fn test_construction_rejects_zero_area() {
    assert!(matches!(
        BufferManager::new(Size::new(0, 100)),
        Err(BufferError::Configuration(_))
    ));
}

#[test]
fn test_growth_discards_previous_content() {
    // Reallocation hands back a zeroed surface; callers repaint after a
    // resize, so prior pixels are deliberately not copied forward
    let mut manager = BufferManager::new(Size::new(10, 10)).unwrap();
    manager.drawable().unwrap().clear(Color::RED);
    manager.set_size(Size::new(100, 100)).unwrap();

    let drawable = manager.drawable().unwrap();
    assert_eq!(drawable.pixel(0, 0), Some(Color::TRANSPARENT));
}

// ============================================================================
// Clip Region Tests
// ============================================================================

#[test]
fn test_clip_tracks_logical_size() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();
    manager.set_size(Size::new(40, 30)).unwrap();

    let mut drawable = manager.drawable().unwrap();
    assert_eq!(drawable.size(), Size::new(40, 30));

    // Inside the clip: preserved
    drawable.set_pixel(39, 29, Color::WHITE);
    assert_eq!(drawable.pixel(39, 29), Some(Color::WHITE));

    // Outside the clip but inside capacity: dropped
    drawable.set_pixel(40, 29, Color::WHITE);
    drawable.set_pixel(39, 30, Color::WHITE);
    assert_eq!(drawable.pixel(40, 29), None);
    assert_eq!(drawable.pixel(39, 30), None);
}

#[test]
fn test_clip_widens_after_regrow() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();
    manager.set_size(Size::new(10, 10)).unwrap();
    manager.set_size(Size::new(90, 90)).unwrap();

    let mut drawable = manager.drawable().unwrap();
    drawable.set_pixel(89, 89, Color::RED);
    assert_eq!(drawable.pixel(89, 89), Some(Color::RED));
}

#[test]
fn test_fill_outside_clip_has_no_effect() {
    let mut manager = BufferManager::new(Size::new(100, 100)).unwrap();
    manager.set_size(Size::new(20, 20)).unwrap();

    let mut drawable = manager.drawable().unwrap();
    drawable.fill_rect(Rect::new(15, 15, 20, 20), Color::RED);
    assert_eq!(drawable.pixel(19, 19), Some(Color::RED));
    assert_eq!(drawable.pixel(20, 20), None);

    // Regrowing the clip exposes capacity pixels that were never written
    drop(drawable);
    manager.set_size(Size::new(40, 40)).unwrap();
    let drawable = manager.drawable().unwrap();
    assert_eq!(
        drawable.pixel(25, 25),
        Some(Color::TRANSPARENT),
        "pixels outside the old clip must not have been drawn into"
    );
}

// ============================================================================
// Disposal State Machine Tests
// ============================================================================

#[test]
fn test_dispose_is_idempotent() {
    let mut manager = BufferManager::new(Size::new(32, 32)).unwrap();
    manager.dispose();
    assert!(manager.is_disposed());
    // Second dispose must not panic or double-free
    manager.dispose();
    assert!(manager.is_disposed());
}

#[test]
fn test_operations_after_dispose_fail() {
    let mut manager = BufferManager::new(Size::new(32, 32)).unwrap();
    manager.dispose();

    assert!(matches!(manager.size(), Err(BufferError::Disposed)));
    assert!(matches!(manager.capacity(), Err(BufferError::Disposed)));
    assert!(matches!(manager.reallocations(), Err(BufferError::Disposed)));
    assert!(matches!(
        manager.set_size(Size::new(10, 10)),
        Err(BufferError::Disposed)
    ));
    assert!(matches!(manager.drawable().err(), Some(BufferError::Disposed)));

    let mut target = backbuffer::PixelTarget::new(Size::new(32, 32));
    assert!(matches!(
        manager.render(&mut target, Point::ORIGIN),
        Err(BufferError::Disposed)
    ));
}
