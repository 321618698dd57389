use engine::graphics::{Circle, CpuRenderer, Renderer2d, text_width};
use engine::surface::{RgbaBufferSurface, Surface, SurfaceSize};
use engine::ui::Rect;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn with_surface(size: SurfaceSize, f: impl FnOnce(&mut dyn Renderer2d)) -> RgbaBufferSurface {
    let mut surface = RgbaBufferSurface::new(size);
    {
        let mut gfx = CpuRenderer::new(surface.frame_mut(), size);
        gfx.begin_frame(size);
        f(&mut gfx);
    }
    surface
}

#[test]
fn disc_centred_on_pixel_corner_is_symmetric() {
    let s = with_surface(SurfaceSize::new(20, 20), |gfx| {
        gfx.clear(WHITE);
        gfx.fill_circle(Circle::new(10.0, 10.0, 5.0), RED);
    });

    assert_eq!(s.pixel(10, 10), Some(RED));
    assert_eq!(s.pixel(5, 10), Some(RED));
    assert_eq!(s.pixel(14, 10), Some(RED));
    assert_eq!(s.pixel(4, 10), Some(WHITE));
    assert_eq!(s.pixel(15, 10), Some(WHITE));
}

#[test]
fn board_with_holes_shows_pieces_only_inside_holes() {
    let size = SurfaceSize::new(40, 20);
    let holes = [Circle::new(10.0, 10.0, 6.0), Circle::new(30.0, 10.0, 6.0)];

    let s = with_surface(size, |gfx| {
        gfx.fill_rect(Rect::from_size(40, 20), BLUE);
        for hole in holes {
            gfx.fill_circle(hole, WHITE);
        }
        gfx.clip_to_circles(&holes);
        // A piece spanning both holes: only the hole-shaped parts land.
        gfx.fill_circle(Circle::new(20.0, 10.0, 15.0), RED);
        gfx.reset_clip();
    });

    assert_eq!(s.pixel(10, 10), Some(RED));
    assert_eq!(s.pixel(20, 10), Some(BLUE), "board between holes stays blue");
    assert_eq!(s.pixel(30, 10), Some(RED), "piece shows through the second hole");
    assert_eq!(s.pixel(0, 0), Some(BLUE));
}

#[test]
fn text_draws_inside_its_measured_box() {
    let size = SurfaceSize::new(40, 12);
    let s = with_surface(size, |gfx| gfx.draw_text_scaled(1, 1, "HI", RED, 2));

    let w = text_width("HI", 2);
    let mut inside = 0;
    for y in 0..size.height {
        for x in 0..size.width {
            if s.pixel(x, y) == Some(RED) {
                assert!(x >= 1 && x < 1 + w, "pixel {x},{y} outside text box");
                inside += 1;
            }
        }
    }
    assert!(inside > 0);
}

#[test]
fn drawing_is_clamped_at_surface_edges() {
    let s = with_surface(SurfaceSize::new(8, 8), |gfx| {
        gfx.fill_rect(Rect::new(6, 6, 100, 100), RED);
        gfx.rect_outline(Rect::from_size(8, 8), BLUE);
    });
    assert_eq!(s.pixel(7, 7), Some(BLUE));
    assert_eq!(s.pixel(6, 6), Some(RED));
    assert_eq!(s.pixel(5, 5), Some([0, 0, 0, 0]));
}
