//! Simulates the resize/draw/present loop of a UI control backed by an
//! off-screen buffer: a window is "dragged" larger one step at a time,
//! repainted off-screen, and blitted onto an in-memory target.
//!
//! Run with `RUST_LOG=debug` to watch the growth policy reallocate only a
//! handful of times across all resizes.

use anyhow::Result;

use backbuffer::{BufferManager, Color, InterpolationMode, PixelTarget, Point, Rect, Size};

fn paint(manager: &mut BufferManager) -> Result<()> {
    let size = manager.size()?;
    let mut drawable = manager.drawable()?;
    drawable.clear(Color::rgb(24, 24, 32));
    // Border and a centered panel, the kind of chrome a control would draw
    drawable.fill_rect(Rect::new(0, 0, size.width, 2), Color::WHITE);
    drawable.fill_rect(Rect::new(0, size.height as i32 - 2, size.width, 2), Color::WHITE);
    drawable.fill_rect(
        Rect::new(
            size.width as i32 / 4,
            size.height as i32 / 4,
            size.width / 2,
            size.height / 2,
        ),
        Color::rgb(200, 80, 40),
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut screen = PixelTarget::new(Size::new(1280, 720));
    let mut manager = BufferManager::for_target(&screen)?;
    manager.set_size(Size::new(400, 300))?;

    // Drag the "window" larger in 8-pixel steps
    for step in 0..40u32 {
        let size = Size::new(400 + step * 8, 300 + step * 6);
        manager.set_size(size)?;
        paint(&mut manager)?;
        manager.render(&mut screen, Point::new(32, 32))?;
    }

    println!(
        "{} resizes, {} reallocations, final capacity {:?}",
        40,
        manager.reallocations()?,
        manager.capacity()?
    );

    // A thumbnail of the final frame, scaled down with smoothing
    let mut thumbnail = PixelTarget::new(Size::new(180, 135));
    let size = manager.size()?;
    manager.render_scaled(
        &mut thumbnail,
        Rect::new(0, 0, 180, 135),
        Rect::of_size(size),
        InterpolationMode::HighQualityBilinear,
    )?;
    println!(
        "thumbnail center pixel: {:?}",
        thumbnail.pixel(90, 67).expect("in bounds")
    );

    manager.dispose();
    Ok(())
}
