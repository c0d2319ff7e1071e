use tearsheet::mesh::plane_grid;

#[test]
fn grid_has_expected_counts() {
    let (vertices, indices) = plane_grid(1.7, 2.0, 30, 50);
    assert_eq!(vertices.len(), 31 * 51);
    assert_eq!(indices.len(), 30 * 50 * 6);
}

#[test]
fn corner_uvs_and_positions() {
    let (vertices, _) = plane_grid(2.0, 4.0, 4, 4);

    let first = &vertices[0];
    assert_eq!(first.uv, [0.0, 0.0]);
    assert_eq!(first.position, [-1.0, -2.0, 0.0]);

    let last = vertices.last().unwrap();
    assert_eq!(last.uv, [1.0, 1.0]);
    assert_eq!(last.position, [1.0, 2.0, 0.0]);

    // Row-major: the second vertex steps along x.
    assert_eq!(vertices[1].uv, [0.25, 0.0]);
    assert_eq!(vertices[1].position[1], -2.0);

    for v in &vertices {
        assert_eq!(v.position[2], 0.0);
        assert!((0.0..=1.0).contains(&v.uv[0]));
        assert!((0.0..=1.0).contains(&v.uv[1]));
    }
}

#[test]
fn first_cell_winding_is_consistent() {
    let (_, indices) = plane_grid(1.0, 1.0, 2, 2);
    // Two triangles per cell; vx = 3.
    assert_eq!(&indices[0..6], &[0, 3, 1, 1, 3, 4]);
}

#[test]
fn indices_stay_in_range() {
    let (vertices, indices) = plane_grid(1.0, 1.0, 30, 50);
    let max = *indices.iter().max().unwrap() as usize;
    assert_eq!(max, vertices.len() - 1);
}
