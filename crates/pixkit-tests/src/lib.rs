//! Integration tests for pixkit crates.
//!
//! End-to-end resize and pipeline scenarios that cross crate boundaries:
//! pixel formats from `pixkit-core`, companding from `pixkit-transfer` and
//! processors from `pixkit-ops`.
//!
//! Set `RUST_LOG=pixkit_ops=trace` to see the resize geometry and pipeline
//! steps while the tests run.

use pixkit_core::{Image, ImageFrame, PixelFormat};

/// Single-frame image whose pixel at (x, y) encodes its own coordinates.
pub fn coordinate_image(width: u32, height: u32) -> Image<u8, 3> {
    let mut frame = ImageFrame::new(width, height);
    for y in 0..height {
        for x in 0..width {
            frame.set_pixel(x, y, [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
    }
    Image::from_frame(frame)
}

/// Smooth diagonal ramp in `[0, 1]`, replicated across channels.
pub fn ramp<T: PixelFormat, const N: usize>(width: u32, height: u32) -> Image<T, N> {
    let mut frame = ImageFrame::new(width, height);
    let span = (width + height).saturating_sub(2).max(1) as f32;
    for y in 0..height {
        for x in 0..width {
            frame.set_pixel(x, y, [T::from_f32((x + y) as f32 / span); N]);
        }
    }
    Image::from_frame(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use half::f16;
    use pixkit_core::{DisposalMethod, FrameMetadata, PropertyTag, Rect, Size};
    use pixkit_ops::resampler::{self, NearestNeighborResampler, TriangleResampler};
    use pixkit_ops::{
        FlipMode, ImageProcessor, OpsError, ResizeMode, ResizeOptions, ResizeProcessor, Rotation,
        Step, pipeline,
    };
    use pixkit_transfer::srgb;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn resize<T: PixelFormat, const N: usize>(image: &mut Image<T, N>, options: ResizeOptions) -> Result<(), OpsError> {
        init_tracing();
        let bounds = image.bounds();
        ResizeProcessor::with_options(options).apply(image, bounds)
    }

    #[test]
    fn test_nearest_downscale_point_samples() {
        let mut img = coordinate_image(100, 100);
        let source = img.clone();
        resize(
            &mut img,
            ResizeOptions::new(Size::new(50, 50)).with_sampler(NearestNeighborResampler),
        )
        .unwrap();

        assert_eq!(img.dimensions(), (50, 50));
        // Destination d samples floor((d + 0.5) * 2)
        assert_eq!(img.root_frame().pixel(0, 0), source.root_frame().pixel(1, 1));
        assert_eq!(img.root_frame().pixel(49, 10), source.root_frame().pixel(99, 21));
    }

    #[test]
    fn test_inferred_width() {
        let mut img: Image<u8, 4> = Image::new(200, 100);
        resize(&mut img, ResizeOptions::new(Size::new(0, 50))).unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[test]
    fn test_both_dimensions_zero() {
        let mut img: Image<u8, 4> = Image::new(200, 100);
        let err = resize(&mut img, ResizeOptions::new(Size::new(0, 0))).unwrap_err();
        assert!(matches!(err, OpsError::InvalidDimensions(_)));
    }

    #[test]
    fn test_min_mode() {
        let mut img: Image<u8, 4> = Image::new(400, 200);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(300, 300)).with_mode(ResizeMode::Min),
        )
        .unwrap();
        assert_eq!(img.dimensions(), (300, 150));
    }

    #[test]
    fn test_min_mode_tie_binds_width() {
        let mut img: Image<u8, 1> = Image::new(64, 48);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(32, 24)).with_mode(ResizeMode::Min),
        )
        .unwrap();
        assert_eq!(img.width(), 32);
        assert_eq!(img.dimensions(), (32, 24));
    }

    #[test]
    fn test_max_mode_never_upscales() {
        for (w, h) in [(10, 10), (99, 50), (100, 100)] {
            let mut img: Image<u8, 3> = Image::new(w, h);
            resize(
                &mut img,
                ResizeOptions::new(Size::new(100, 100)).with_mode(ResizeMode::Max),
            )
            .unwrap();
            assert_eq!(img.dimensions(), (w, h));
        }

        let mut img: Image<u8, 3> = Image::new(300, 150);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(100, 100)).with_mode(ResizeMode::Max),
        )
        .unwrap();
        assert_eq!(img.dimensions(), (100, 50));
    }

    #[test]
    fn test_pad_and_box_pad_canvas() {
        for (w, h) in [(10, 40), (300, 20), (50, 50), (7, 3)] {
            let mut padded: Image<u8, 3> = Image::new(w, h);
            resize(
                &mut padded,
                ResizeOptions::new(Size::new(64, 48)).with_mode(ResizeMode::Pad),
            )
            .unwrap();
            assert_eq!(padded.dimensions(), (64, 48));

            let mut boxed: Image<u8, 3> = Image::new(w, h);
            resize(
                &mut boxed,
                ResizeOptions::new(Size::new(64, 48)).with_mode(ResizeMode::BoxPad),
            )
            .unwrap();
            assert!(boxed.width() >= 64 && boxed.height() >= 48);
        }
    }

    #[test]
    fn test_stretch_identity_every_kernel() {
        let source: Image<f32, 3> = ramp(17, 11);
        for sampler in resampler::builtin() {
            let mut img = source.clone();
            resize(
                &mut img,
                ResizeOptions::new(Size::new(17, 11))
                    .with_mode(ResizeMode::Stretch)
                    .with_shared_sampler(sampler.clone()),
            )
            .unwrap();
            for ((_, _, a), (_, _, b)) in img.root_frame().pixels().zip(source.root_frame().pixels()) {
                for c in 0..3 {
                    assert_abs_diff_eq!(a[c], b[c], epsilon = 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_constant_survives_every_kernel_and_format() {
        fn check<T: PixelFormat, const N: usize>(value: f32, epsilon: f32) {
            for sampler in resampler::builtin() {
                for size in [Size::new(13, 7), Size::new(40, 60)] {
                    let mut img: Image<T, N> = Image::filled(23, 19, [T::from_f32(value); N]);
                    resize(
                        &mut img,
                        ResizeOptions::new(size)
                            .with_mode(ResizeMode::Stretch)
                            .with_shared_sampler(sampler.clone())
                            .with_compand(true),
                    )
                    .unwrap();
                    for (_, _, px) in img.root_frame().pixels() {
                        for c in px {
                            assert_abs_diff_eq!(c.to_f32(), value, epsilon = epsilon);
                        }
                    }
                }
            }
        }
        check::<u8, 4>(0.6, 1.0 / 255.0);
        check::<u16, 1>(0.25, 1.0 / 65535.0 * 4.0);
        check::<f16, 3>(0.5, 2e-3);
        check::<f32, 2>(0.8, 1e-4);
    }

    #[test]
    fn test_multi_frame_resize() {
        let meta = [
            FrameMetadata {
                delay: 4,
                disposal: DisposalMethod::DoNotDispose,
            },
            FrameMetadata {
                delay: 8,
                disposal: DisposalMethod::RestoreToBackground,
            },
            FrameMetadata::default(),
        ];
        let frames = meta
            .iter()
            .enumerate()
            .map(|(i, m)| ImageFrame::filled(30, 20, [i as u8 * 50; 4]).with_metadata(*m))
            .collect();
        let mut img: Image<u8, 4> = Image::from_frames(frames).unwrap();
        img.metadata.add(PropertyTag::ARTIST, "pixkit");
        img.metadata.repeat_count = 3;

        resize(
            &mut img,
            ResizeOptions::new(Size::new(12, 12))
                .with_mode(ResizeMode::Stretch)
                .with_sampler(TriangleResampler),
        )
        .unwrap();

        assert_eq!(img.frame_count(), 3);
        for (i, frame) in img.frames().iter().enumerate() {
            assert_eq!(frame.dimensions(), (12, 12));
            assert_eq!(frame.metadata, meta[i]);
            assert_eq!(frame.pixel(6, 6), [i as u8 * 50; 4]);
        }
        assert_eq!(img.metadata.repeat_count, 3);
        assert_eq!(img.metadata.get("Artist").and_then(|v| v.as_str()), Some("pixkit"));
    }

    #[test]
    fn test_rectangles_write_only_inside_target() {
        let mut img = coordinate_image(40, 40);
        let before = img.clone();
        let target = Rect::new(10, 5, 8, 8);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(40, 40))
                .with_sampler(TriangleResampler)
                .with_rectangles(Rect::new(20, 20, 16, 16), target),
        )
        .unwrap();

        assert_eq!(img.dimensions(), (40, 40));
        let mut changed = 0;
        for (x, y, px) in img.root_frame().pixels() {
            if target.contains(x as i32, y as i32) {
                changed += (px != before.root_frame().pixel(x, y)) as usize;
            } else {
                assert_eq!(px, before.root_frame().pixel(x, y), "({x}, {y})");
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_rectangles_into_larger_canvas() {
        let mut img = coordinate_image(20, 20);
        let before = img.clone();
        let target = Rect::new(25, 25, 10, 10);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(40, 40))
                .with_sampler(TriangleResampler)
                .with_rectangles(Rect::new(0, 0, 20, 20), target),
        )
        .unwrap();

        assert_eq!(img.dimensions(), (40, 40));
        let mut changed = 0;
        for (x, y, px) in img.root_frame().pixels() {
            if target.contains(x as i32, y as i32) {
                changed += (px != [0; 3]) as usize;
            } else if x < 20 && y < 20 {
                // Old pixels carried over where the frames overlap
                assert_eq!(px, before.root_frame().pixel(x, y), "({x}, {y})");
            } else {
                assert_eq!(px, [0; 3], "({x}, {y})");
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn test_rectangles_into_smaller_canvas() {
        let mut img = coordinate_image(40, 40);
        let before = img.clone();
        let target = Rect::new(0, 0, 10, 10);
        resize(
            &mut img,
            ResizeOptions::new(Size::new(20, 20))
                .with_sampler(NearestNeighborResampler)
                .with_rectangles(Rect::new(0, 0, 40, 40), target),
        )
        .unwrap();

        assert_eq!(img.dimensions(), (20, 20));
        for (x, y, px) in img.root_frame().pixels() {
            if target.contains(x as i32, y as i32) {
                // 4x downscale samples floor((d + 0.5) * 4)
                assert_eq!(px, before.root_frame().pixel(x * 4 + 2, y * 4 + 2), "({x}, {y})");
            } else {
                assert_eq!(px, before.root_frame().pixel(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_rectangles_out_of_bounds_leave_image() {
        let mut img = coordinate_image(20, 20);
        let before = img.clone();
        let err = resize(
            &mut img,
            ResizeOptions::new(Size::new(20, 20)).with_rectangles(Rect::new(-1, 0, 5, 5), Rect::new(0, 0, 5, 5)),
        )
        .unwrap_err();
        assert!(err.is_bounds_error());
        assert_eq!(img.root_frame().data(), before.root_frame().data());
    }

    #[test]
    fn test_compand_brightens_averages() {
        // 1px black/white checkerboard halved: linear-light average is brighter
        let mut frame: ImageFrame<u8, 3> = ImageFrame::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let v = if (x + y) % 2 == 0 { 0 } else { 255 };
                frame.set_pixel(x, y, [v; 3]);
            }
        }
        let source = Image::from_frame(frame);

        let run = |compand: bool| {
            let mut img = source.clone();
            resize(
                &mut img,
                ResizeOptions::new(Size::new(4, 4))
                    .with_mode(ResizeMode::Stretch)
                    .with_sampler(TriangleResampler)
                    .with_compand(compand),
            )
            .unwrap();
            img.root_frame().pixel(1, 1)[0].to_f32()
        };

        assert_abs_diff_eq!(run(false), 0.5, epsilon = 1.0 / 255.0);
        assert_abs_diff_eq!(run(true), srgb::oetf(0.5), epsilon = 1.0 / 255.0);
    }

    #[test]
    fn test_crop_mode_fills_canvas() {
        let mut img: Image<u8, 3> = Image::filled(200, 100, [200, 100, 50]);
        resize(&mut img, ResizeOptions::new(Size::new(50, 50))).unwrap();
        assert_eq!(img.dimensions(), (50, 50));
        for (_, _, px) in img.root_frame().pixels() {
            assert_eq!(px, [200, 100, 50]);
        }
    }

    #[test]
    fn test_crop_mode_rounds_overflowing_axis() {
        // 3x1 into 10x2: the scaled height 3.33 rounds to 3 and is centred at y = -1
        let mut img = coordinate_image(3, 1);
        let processor = ResizeProcessor::new(10, 2, false);
        let geometry = processor.geometry(img.size(), img.bounds()).unwrap();
        assert_eq!(geometry.target, Rect::new(0, -1, 10, 3));

        resize(&mut img, ResizeOptions::new(Size::new(10, 2))).unwrap();
        assert_eq!(img.dimensions(), (10, 2));
    }

    #[test]
    fn test_pipeline_end_to_end() {
        init_tracing();
        let source = coordinate_image(64, 32);
        let steps = vec![
            Step::processor(ResizeProcessor::with_sampler(NearestNeighborResampler, 32, 16, false)),
            Step::processor(pixkit_ops::FlipProcessor::new(FlipMode::Horizontal)),
            Step::processor(pixkit_ops::RotateProcessor::new(Rotation::Rotate90)),
        ];
        let out = pipeline::generate(&source, &steps).unwrap();
        assert_eq!(out.dimensions(), (16, 32));
        assert_eq!(source.dimensions(), (64, 32));

        // After the flip, the top-left pixel came from the top-right source sample;
        // rotating clockwise moves it to the top-right corner.
        let corner = out.root_frame().pixel(15, 0);
        assert_eq!(corner, source.root_frame().pixel(63, 1));
    }

    #[test]
    fn test_pipeline_fail_fast() {
        init_tracing();
        let mut img = coordinate_image(16, 16);
        let result = pipeline::mutate_with(&mut img, |ops| {
            ops.resize(8, 8, false)?
                .crop(Rect::new(4, 4, 8, 8))?
                .rotate(Rotation::Rotate90)?;
            Ok(())
        });
        assert!(result.unwrap_err().is_bounds_error());
        assert_eq!(img.dimensions(), (8, 8));
    }
}
