use proptest::prelude::*;
use quarry_geom::Vec3;
use quarry_model::{Face, Model, ModelFace, Texture, TextureId};

fn tex(id: u16) -> Texture {
    Texture {
        id: TextureId(id),
        x: 0.0,
        y: 0.0,
        width: 16.0,
        height: 16.0,
    }
}

fn vapprox(a: Vec3, b: Vec3) -> bool {
    (a - b).length() <= 1e-4
}

fn arb_face() -> impl Strategy<Value = Face> {
    (0usize..6).prop_map(|i| Face::from_index(i).unwrap())
}

// A single quad somewhere inside the block, in pixel units.
fn arb_model_face() -> impl Strategy<Value = ModelFace> {
    (arb_face(), 0u8..16, 0u8..16, 1u8..=16, 1u8..=16, 0u8..=16, any::<bool>()).prop_map(
        |(face, x, y, w, h, depth, cull)| {
            ModelFace::new(face, tex(1), x as f32, y as f32, w as f32, h as f32, depth as f32)
                .with_cullable(cull)
        },
    )
}

fn arb_model() -> impl Strategy<Value = Model> {
    prop::collection::vec(arb_model_face(), 0..8).prop_map(|faces| {
        let mut m = Model::new();
        for f in faces {
            m.add_face(f);
        }
        m
    })
}

fn same_geometry(a: &Model, b: &Model) -> bool {
    a.len() == b.len()
        && a.faces().iter().zip(b.faces()).all(|(fa, fb)| {
            fa.face == fb.face
                && fa
                    .vertices
                    .iter()
                    .zip(&fb.vertices)
                    .all(|(va, vb)| vapprox(va.pos, vb.pos))
        })
}

proptest! {
    // A full turn about any axis restores positions and orientation tags.
    #[test]
    fn full_turn_is_identity(model in arb_model(), axis in 0u8..3) {
        let mut turned = model.clone();
        for _ in 0..4 {
            match axis {
                0 => turned.rotate_x(90.0),
                1 => turned.rotate_y(90.0),
                _ => turned.rotate_z(90.0),
            };
        }
        prop_assert!(same_geometry(&model, &turned));

        let mut once = model.clone();
        match axis {
            0 => once.rotate_x(360.0),
            1 => once.rotate_y(360.0),
            _ => once.rotate_z(360.0),
        };
        prop_assert!(same_geometry(&model, &once));
    }

    // Flipping twice restores Y values and tags.
    #[test]
    fn flip_twice_is_identity(model in arb_model()) {
        let mut flipped = model.clone();
        flipped.flip().flip();
        prop_assert!(same_geometry(&model, &flipped));
    }

    // Join appends exactly B's faces, each shifted by offset / 16.
    #[test]
    fn join_appends_shifted_copies(
        a in arb_model(),
        b in arb_model(),
        ox in -16i8..=16,
        oy in -16i8..=16,
        oz in -16i8..=16,
    ) {
        let mut joined = a.clone();
        joined.join(&b, ox as f32, oy as f32, oz as f32);
        prop_assert_eq!(joined.len(), a.len() + b.len());
        let shift = Vec3::new(ox as f32, oy as f32, oz as f32) / 16.0;
        for (src, copy) in b.faces().iter().zip(&joined.faces()[a.len()..]) {
            prop_assert_eq!(src.face, copy.face);
            prop_assert_eq!(src.cullable, copy.cullable);
            prop_assert_eq!(src.texture, copy.texture);
            for (vs, vc) in src.vertices.iter().zip(&copy.vertices) {
                prop_assert!(vapprox(vs.pos + shift, vc.pos));
            }
        }
    }
}

#[test]
fn realign_restores_constructor_uvs() {
    let mut m = Model::new();
    for face in Face::ALL {
        m.add_face(ModelFace::new(face, tex(2), 2.0, 4.0, 8.0, 6.0, 5.0));
    }
    let before = m.clone();
    for f in m.faces_mut() {
        for v in &mut f.vertices {
            v.u = 0.0;
            v.v = 0.0;
        }
    }
    m.realign_textures();
    assert_eq!(m, before);
}

#[test]
fn back_face_u_runs_against_x() {
    let f = ModelFace::new(Face::Back, tex(3), 0.0, 0.0, 16.0, 16.0, 0.0);
    for v in &f.vertices {
        assert!((v.u - (1.0 - v.pos.x)).abs() < 1e-6);
        assert!((v.v - (1.0 - v.pos.y)).abs() < 1e-6);
    }
}
