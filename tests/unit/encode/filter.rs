use super::*;
use crate::card::model::QualityTier;

fn compile_with(options: &RenderOptions) -> FilterGraph {
    let input = CompileInput {
        options,
        canvas: Canvas::new(1080, 1920).unwrap(),
        background: Path::new("/bg/tech/loop.mp4"),
        overlay: Path::new("/tmp/overlay-req-1.png"),
        overlay_size: (1080, 1920),
        output: PathBuf::from("/out/req-1.mp4"),
    };
    FilterGraphCompiler::new(EncoderPath::Libx264).compile(&input)
}

fn opts(quality: QualityTier, animation: Animation) -> RenderOptions {
    RenderOptions {
        quality,
        animation,
        ..RenderOptions::default()
    }
}

#[test]
fn default_graph_has_three_labelled_chains() {
    let g = compile_with(&RenderOptions::default());
    assert_eq!(
        g.expressions(),
        vec![
            "[0:v]scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920,setsar=1[bg]"
                .to_string(),
            "[1:v]format=rgba[ov]".to_string(),
            "[bg][ov]overlay=x=(W-w)/2:y=(H-h)/2,fade=t=in:st=0:d=0.5:color=black[out]".to_string(),
        ]
    );
    assert_eq!(g.arg_value("-filter_complex"), Some(g.filter_complex().as_str()));
}

#[test]
fn playback_rate_and_blur_extend_the_background_stage() {
    let o = RenderOptions {
        background_playback_rate: 2.0,
        overlay_blur_radius: 8.5,
        ..RenderOptions::default()
    };
    let bg = &compile_with(&o).expressions()[0];
    assert!(bg.contains(",setpts=(1/2)*PTS,gblur=sigma=8.5,"), "{bg}");
}

#[test]
fn mismatched_overlay_is_scaled() {
    let o = RenderOptions::default();
    let input = CompileInput {
        options: &o,
        canvas: Canvas::new(1080, 1080).unwrap(),
        background: Path::new("bg.mp4"),
        overlay: Path::new("ov.png"),
        overlay_size: (1081, 1081),
        output: PathBuf::from("out.mp4"),
    };
    let g = FilterGraphCompiler::default().compile(&input);
    assert_eq!(g.expressions()[1], "[1:v]scale=1080:1080,format=rgba[ov]");
}

#[test]
fn slide_escapes_commas_and_evaluates_per_frame() {
    let g = compile_with(&opts(QualityTier::Medium, Animation::Slide));
    let out = &g.expressions()[2];
    assert!(out.contains("x=(W-w)/2-W*max(0\\,1-t/1)"), "{out}");
    assert!(out.contains(":eval=frame"));
}

#[test]
fn zoom_parameterises_both_offsets() {
    let g = compile_with(&opts(QualityTier::Medium, Animation::Zoom));
    let out = &g.expressions()[2];
    assert!(out.contains("x=(W-w)/2+(1-min(t*2\\,1))*w/2"));
    assert!(out.contains("y=(H-h)/2+(1-min(t*2\\,1))*h/2"));
}

#[test]
fn unsharp_only_for_high_and_ultra() {
    for (tier, expected) in [
        (QualityTier::Low, false),
        (QualityTier::Medium, false),
        (QualityTier::High, true),
        (QualityTier::Ultra, true),
    ] {
        let g = compile_with(&opts(tier, Animation::Fade));
        assert_eq!(g.has_filter("unsharp"), expected, "{tier:?}");
        assert!(g.has_filter("fade"));
    }
}

#[test]
fn ultra_crf_never_exceeds_low() {
    let low = compile_with(&opts(QualityTier::Low, Animation::None));
    let ultra = compile_with(&opts(QualityTier::Ultra, Animation::None));
    let crf = |g: &FilterGraph| g.arg_value("-crf").unwrap().parse::<u8>().unwrap();
    assert!(crf(&ultra) <= crf(&low));
}

#[test]
fn argument_layout_matches_encoder_contract() {
    let g = compile_with(&RenderOptions::default());
    assert_eq!(&g.args[..6], &["-y", "-v", "error", "-stream_loop", "-1", "-i"]);
    assert_eq!(g.args[6], "/bg/tech/loop.mp4");
    assert_eq!(&g.args[7..10], &["-loop", "1", "-i"]);
    assert_eq!(g.args[10], "/tmp/overlay-req-1.png");
    assert_eq!(g.arg_value("-map"), Some("[out]"));
    assert_eq!(g.arg_value("-t"), Some("10"));
    assert_eq!(g.args.last().map(String::as_str), Some("/out/req-1.mp4"));
}

#[test]
fn numbers_drop_trailing_zeros() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(0.5), "0.5");
    assert_eq!(num(0.3333333), "0.333");
    assert_eq!(num(0.0), "0");
}
