use glam::Vec2;

use crate::input::DirectionalInput;

/// Raw direction in `{-1, 0, 1}` per axis, +y up.
pub fn intent(input: DirectionalInput) -> Vec2 {
    Vec2::new(
        axis(input.right) - axis(input.left),
        axis(input.up) - axis(input.down),
    )
}

/// Candidate position after one step, or `None` when nothing is held
/// (or opposing keys cancel out).
///
/// The intent is normalized first so diagonal movement covers the same
/// distance per step as axis-aligned movement.
pub fn propose_move(position: Vec2, input: DirectionalInput, speed: f32, dt: f32) -> Option<Vec2> {
    let direction = intent(input);
    if direction == Vec2::ZERO {
        return None;
    }
    Some(position + direction.normalize() * speed * dt)
}

fn axis(pressed: bool) -> f32 {
    if pressed {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn idle_input_proposes_nothing() {
        assert_eq!(propose_move(Vec2::ZERO, DirectionalInput::NONE, 200.0, DT), None);
    }

    #[test]
    fn opposing_keys_cancel() {
        let input = DirectionalInput {
            left: true,
            right: true,
            up: true,
            down: true,
        };
        assert_eq!(intent(input), Vec2::ZERO);
        assert_eq!(propose_move(Vec2::ONE, input, 200.0, DT), None);
    }

    #[test]
    fn up_is_positive_y() {
        let input = DirectionalInput {
            up: true,
            ..DirectionalInput::NONE
        };
        let moved = propose_move(Vec2::ZERO, input, 60.0, 1.0).expect("should move");
        assert_eq!(moved, Vec2::new(0.0, 60.0));
    }

    #[test]
    fn diagonal_displacement_matches_axis_displacement() {
        let start = Vec2::new(100.0, 100.0);
        let diagonal = DirectionalInput {
            up: true,
            right: true,
            ..DirectionalInput::NONE
        };
        let diag = propose_move(start, diagonal, 200.0, DT).expect("diagonal moves") - start;
        let straight =
            propose_move(start, DirectionalInput::RIGHT, 200.0, DT).expect("right moves") - start;

        let expected = 200.0 * DT;
        assert!((diag.length() - expected).abs() < 1e-4);
        assert!((straight.length() - expected).abs() < 1e-4);
        assert!((diag.x - diag.y).abs() < 1e-6);
    }

    #[test]
    fn proposal_does_not_depend_on_prior_calls() {
        let start = Vec2::new(5.0, 5.0);
        let a = propose_move(start, DirectionalInput::RIGHT, 200.0, DT);
        let b = propose_move(start, DirectionalInput::RIGHT, 200.0, DT);
        assert_eq!(a, b);
    }
}
