//! Resource resolution: shadings, graphics state dictionaries and forms.

mod common;

use common::PdfBuilder;
use vecgen_core::convert::page_route;
use vecgen_core::document::{PDFDocument, PDFPage};
use vecgen_core::error::GenError;
use vecgen_core::model::{AffineTransform, Point, Rect, Rgba};
use vecgen_core::resources::{ExtGStateCommand, FormRegistry, Resources, XObject};
use vecgen_core::route::{BlendMode, DashPattern, DrawRoute, DrawStep, GradientKind};

const MEDIABOX: &str = "[0 0 100 100]";

fn open(builder: PdfBuilder) -> (PDFDocument, PDFPage) {
    let doc = PDFDocument::new(builder.build()).unwrap();
    let page = PDFPage::create_pages(&doc).unwrap().remove(0);
    (doc, page)
}

fn resolve(builder: PdfBuilder) -> vecgen_core::Result<Resources> {
    let (doc, page) = open(builder);
    Resources::resolve(&doc, &page.resources, &mut FormRegistry::new())
}

fn route(builder: PdfBuilder) -> vecgen_core::Result<DrawRoute> {
    let (doc, page) = open(builder);
    page_route(&doc, &page)
}

// ============================================================================
// Shadings
// ============================================================================

const STITCHED: &str = "<< /FunctionType 3 /Domain [0 1] /Bounds [0.25] /Encode [0 1 0 1] \
    /Functions [ \
      << /FunctionType 2 /Domain [0 1] /C0 [1 0 0] /C1 [0 1 0] /N 1 >> \
      << /FunctionType 2 /Domain [0 1] /C0 [0 1 0] /C1 [0 0 1] /N 1 >> ] >>";

#[test]
fn test_axial_shading_stops_at_breakpoints() {
    let resources = resolve(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /Shading << /Sh0 10 0 R >> >>", "/Sh0 sh")
            .object(
                10,
                format!(
                    "<< /ShadingType 2 /ColorSpace /DeviceRGB /Coords [0 0 100 0] /Function {STITCHED} >>"
                ),
            ),
    )
    .unwrap();

    let gradient = &resources.gradients["Sh0"];
    assert_eq!(gradient.kind, GradientKind::Axial);
    assert_eq!(gradient.start_point, Point::new(0.0, 0.0));
    assert_eq!(gradient.end_point, Point::new(100.0, 0.0));
    assert_eq!(
        gradient.stops,
        vec![
            (0.0, Rgba::opaque(1.0, 0.0, 0.0)),
            (0.25, Rgba::opaque(0.0, 1.0, 0.0)),
            (1.0, Rgba::opaque(0.0, 0.0, 1.0)),
        ]
    );
    assert!(!gradient.options.draws_before_start);
    assert!(!gradient.options.draws_after_end);
}

#[test]
fn test_radial_shading_extend() {
    let resources = resolve(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /Shading << /R 10 0 R >> >>", "")
            .object(
                10,
                "<< /ShadingType 3 /Coords [50 50 0 50 50 40] /Extend [true false] \
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [1] /C1 [0] /N 1 >> >>",
            ),
    )
    .unwrap();

    let gradient = &resources.gradients["R"];
    assert_eq!(
        gradient.kind,
        GradientKind::Radial {
            start_radius: 0.0,
            end_radius: 40.0
        }
    );
    assert_eq!(gradient.stops.len(), 2);
    assert_eq!(gradient.stops[0].1, Rgba::opaque(1.0, 1.0, 1.0));
    assert!(gradient.options.draws_before_start);
    assert!(!gradient.options.draws_after_end);
}

#[test]
fn test_sh_paints_gradient() {
    let route = route(
        PdfBuilder::new()
            .single_page(
                MEDIABOX,
                "<< /Shading << /Sh0 10 0 R >> >>",
                "q 0 0 10 10 re W n /Sh0 sh Q",
            )
            .object(
                10,
                "<< /ShadingType 2 /Coords [0 0 10 0] \
                 /Function << /FunctionType 2 /Domain [0 1] /C0 [0] /C1 [1] /N 1 >> >>",
            ),
    )
    .unwrap();

    assert!(route.gradient("Sh0").is_some());
    assert!(route.steps.contains(&DrawStep::PaintWithGradient {
        name: "Sh0".into(),
        start: None,
        end: None,
    }));
}

#[test]
fn test_unsupported_shading_fails_only_when_painted() {
    let builder = |content: &'static str| {
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /Shading << /Mesh 10 0 R >> >>", content)
            .object(10, "<< /ShadingType 4 /ColorSpace /DeviceRGB >>")
    };

    let resources = resolve(builder("")).unwrap();
    assert!(resources.gradients.is_empty());
    assert!(resources.unsupported_shadings.contains_key("Mesh"));

    assert!(route(builder("0 0 m")).is_ok());
    assert!(matches!(
        route(builder("/Mesh sh")),
        Err(GenError::NotImplemented(_))
    ));
}

fn sampled_shading(function_dict: &str) -> PdfBuilder {
    PdfBuilder::new()
        .single_page(MEDIABOX, "<< /Shading << /S 10 0 R >> >>", "/S sh")
        .object(10, "<< /ShadingType 2 /Coords [0 0 10 0] /Function 11 0 R >>")
        .stream(11, function_dict, "ABCDEF")
}

#[test]
fn test_sampled_function_decode_must_match_range() {
    let result = resolve(sampled_shading(
        "/FunctionType 0 /Domain [0 1] /Range [0 1 0 1 0 1] /Decode [0 1] \
         /Size [2] /BitsPerSample 8",
    ));
    assert!(matches!(result, Err(GenError::DecodeError(_))));
}

#[test]
fn test_sampled_function_size_is_bounded() {
    let result = route(sampled_shading(
        "/FunctionType 0 /Domain [0 1] /Range [0 1 0 1 0 1] \
         /Size [9223372036854775807] /BitsPerSample 8",
    ));
    assert!(matches!(result, Err(GenError::DecodeError(_))));
}

#[test]
fn test_sampled_function_resolves() {
    let resources = resolve(sampled_shading(
        "/FunctionType 0 /Domain [0 1] /Range [0 1 0 1 0 1] /Size [2] /BitsPerSample 8",
    ))
    .unwrap();
    assert_eq!(resources.gradients["S"].stops.len(), 2);
}

// ============================================================================
// Graphics state dictionaries
// ============================================================================

#[test]
fn test_ext_gstate_canonical_order() {
    let resources = resolve(PdfBuilder::new().single_page(
        MEDIABOX,
        "<< /ExtGState << /GS0 << /BM /Multiply /D [[2 1] 0.5] /LW 3 /ca 0.5 /CA 0.25 >> >> >>",
        "",
    ))
    .unwrap();

    assert_eq!(
        resources.ext_gstates["GS0"],
        vec![
            ExtGStateCommand::StrokeAlpha(0.25),
            ExtGStateCommand::FillAlpha(0.5),
            ExtGStateCommand::LineWidth(3.0),
            ExtGStateCommand::Dash(DashPattern::new(0.5, [2.0, 1.0])),
            ExtGStateCommand::BlendMode(BlendMode::Multiply),
        ]
    );
}

#[test]
fn test_soft_mask_is_unsupported() {
    let resources = resolve(PdfBuilder::new().single_page(
        MEDIABOX,
        "<< /ExtGState << /Plain << /SMask /None >> /Masked << /SMask << /S /Luminosity >> >> >> >>",
        "",
    ))
    .unwrap();

    assert!(resources.ext_gstates["Plain"].is_empty());
    assert!(matches!(
        resources.ext_gstates["Masked"][..],
        [ExtGStateCommand::Unsupported(_)]
    ));
}

// ============================================================================
// Form XObjects
// ============================================================================

#[test]
fn test_form_drawn_through_subroute() {
    let route = route(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /XObject << /Fm0 10 0 R >> >>", "/Fm0 Do")
            .stream(
                10,
                "/Type /XObject /Subtype /Form /BBox [0 0 20 10] /Matrix [2 0 0 2 5 5]",
                "0 0 20 10 re f",
            ),
    )
    .unwrap();

    assert_eq!(
        route.steps,
        vec![DrawStep::saving_gstate([
            DrawStep::ConcatCtm(AffineTransform::new(2.0, 0.0, 0.0, 2.0, 5.0, 5.0)),
            DrawStep::ClipToRect(Rect::new(0.0, 0.0, 20.0, 10.0)),
            DrawStep::SubrouteWithName("Fm0".into()),
        ])]
    );
    let form = route.subroutes.get_by_name("Fm0").unwrap();
    assert_eq!(form.bounding_rect, Rect::new(0.0, 0.0, 20.0, 10.0));
    assert_eq!(form.steps.len(), 2);
}

#[test]
fn test_shared_form_interpreted_once() {
    let route = route(
        PdfBuilder::new()
            .single_page(
                MEDIABOX,
                "<< /XObject << /A 10 0 R /B 10 0 R >> >>",
                "/A Do /B Do /A Do",
            )
            .stream(10, "/Subtype /Form /BBox [0 0 1 1]", "0 0 1 1 re f"),
    )
    .unwrap();

    assert_eq!(route.subroutes.len(), 1);
    let names: Vec<&DrawStep> = route
        .steps
        .iter()
        .flat_map(|step| {
            let mut found = Vec::new();
            step.walk(&mut |s| {
                if matches!(s, DrawStep::SubrouteWithName(_)) {
                    found.push(s);
                }
            });
            found
        })
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.iter().all(|s| **s == DrawStep::SubrouteWithName("A".into())));
}

#[test]
fn test_nested_forms_register_inner_first() {
    let route = route(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /XObject << /Outer 10 0 R >> >>", "/Outer Do")
            .stream(
                10,
                "/Subtype /Form /BBox [0 0 50 50] /Resources << /XObject << /Inner 11 0 R >> >>",
                "/Inner Do",
            )
            .stream(11, "/Subtype /Form /BBox [0 0 5 5]", "0 0 5 5 re S"),
    )
    .unwrap();

    let order: Vec<&str> = route.subroutes.iter().map(|(name, _)| name).collect();
    assert_eq!(order, ["Inner", "Outer"]);
    let outer = route.subroutes.get_by_name("Outer").unwrap();
    assert!(outer.subroutes.is_empty());
}

#[test]
fn test_form_inherits_parent_resources() {
    let route = route(
        PdfBuilder::new()
            .single_page(
                MEDIABOX,
                "<< /XObject << /Fm0 10 0 R >> /ExtGState << /Half << /ca 0.5 >> >> >>",
                "/Fm0 Do",
            )
            .stream(10, "/Subtype /Form /BBox [0 0 1 1]", "/Half gs 0 0 1 1 re f"),
    )
    .unwrap();

    let form = route.subroutes.get_by_name("Fm0").unwrap();
    assert!(form.steps.contains(&DrawStep::fill_with(
        Rgba::new(0.0, 0.0, 0.0, 0.5),
        vecgen_core::route::FillRule::Winding
    )));
}

#[test]
fn test_self_referencing_form() {
    let err = route(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /XObject << /Loop 10 0 R >> >>", "/Loop Do")
            .stream(
                10,
                "/Subtype /Form /BBox [0 0 1 1] /Resources << /XObject << /Loop 10 0 R >> >>",
                "/Loop Do",
            ),
    )
    .unwrap_err();
    assert!(matches!(err, GenError::CyclicSubroute(ref name) if name == "Loop"));
}

#[test]
fn test_form_without_bbox() {
    let err = route(
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /XObject << /Fm0 10 0 R >> >>", "")
            .stream(10, "/Subtype /Form", "0 0 m"),
    )
    .unwrap_err();
    assert!(matches!(err, GenError::KeyError(ref key) if key == "BBox"));
}

#[test]
fn test_image_xobject_not_implemented() {
    let builder = |content: &'static str| {
        PdfBuilder::new()
            .single_page(MEDIABOX, "<< /XObject << /Im0 10 0 R >> >>", content)
            .stream(
                10,
                "/Subtype /Image /Width 1 /Height 1 /BitsPerComponent 8 /ColorSpace /DeviceGray",
                "x",
            )
    };

    let resources = resolve(builder("")).unwrap();
    assert_eq!(resources.xobjects.get("Im0"), Some(&XObject::Image));
    assert!(matches!(
        route(builder("/Im0 Do")),
        Err(GenError::NotImplemented(_))
    ));
}
