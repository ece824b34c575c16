#[cfg(test)]
mod tests {
    use izhikevich_solvers::analysis::{CheckpointComparison, ReferenceCheckpoints};
    use izhikevich_solvers::model::{InputCurrent, IzhikevichParameters};
    use izhikevich_solvers::solver::{backward_euler, StepKind};

    fn reference_run() -> izhikevich_solvers::solver::Trajectory {
        let params = IzhikevichParameters::default();

        backward_euler::integrate(
            &params,
            &InputCurrent::Constant(100.),
            params.resting_state(),
            0.25,
            1000.,
            &Default::default(),
        )
    }

    #[test]
    fn test_matches_bundled_reference_checkpoints() {
        let trajectory = reference_run();

        for comparison in ReferenceCheckpoints::default().compare(&trajectory, 0.25) {
            match comparison {
                CheckpointComparison::Compared { error_v, error_w, .. } => {
                    assert!(error_v < 1e-2, "{}", comparison);
                    assert!(error_w < 1e-2, "{}", comparison);
                },
                CheckpointComparison::TimeExceedsDuration { .. } => {
                    panic!("checkpoint unexpectedly out of range");
                },
            }
        }
    }

    #[test]
    fn test_published_table_is_a_soft_comparison_only() {
        let trajectory = reference_run();

        // the hand tabulated table diverges from what the method actually
        // produces, so it is reported through compare but never asserted
        let comparisons = ReferenceCheckpoints::published().compare(&trajectory, 0.25);

        let mut largest_error = 0.;
        for comparison in &comparisons {
            assert!(!comparison.is_out_of_range());

            if let CheckpointComparison::Compared { error_v, .. } = comparison {
                largest_error = f64::max(largest_error, *error_v);
            }
        }

        assert!(largest_error > 1.);
    }

    #[test]
    fn test_newton_iterations_are_reported() {
        let trajectory = reference_run();
        let iterations = trajectory.newton_iterations();

        for (kind, count) in trajectory.steps.iter().zip(iterations.iter()) {
            match kind {
                StepKind::NewtonSolve { iterations } => {
                    assert!(*iterations > 0);
                    assert_eq!(count, iterations);
                },
                // spike reset steps skip the solve and report zero
                StepKind::SpikeReset | StepKind::Initial => assert_eq!(*count, 0),
                other => panic!("unexpected step kind {:?}", other),
            }
        }
    }

    #[test]
    fn test_spike_steps_clip_and_reset_exactly() {
        let params = IzhikevichParameters::default();
        let trajectory = reference_run();

        let reset_indices: Vec<usize> = trajectory
            .steps
            .iter()
            .enumerate()
            .filter(|(_, &kind)| kind == StepKind::SpikeReset)
            .map(|(i, _)| i)
            .collect();

        // a 100 pA sustained current produces repeated spikes
        assert!(!reset_indices.is_empty());

        for &i in &reset_indices {
            assert_eq!(trajectory.voltages[i - 1], params.v_peak);
            assert_eq!(trajectory.voltages[i], params.c);
        }
    }

    #[test]
    fn test_backward_euler_is_bit_reproducible() {
        assert_eq!(reference_run(), reference_run());
    }

    #[test]
    fn test_newton_converges_quickly_in_the_reference_regime() {
        let trajectory = reference_run();

        // well conditioned steps should converge far below the cap
        let solves: Vec<usize> = trajectory
            .steps
            .iter()
            .filter_map(|kind| match kind {
                StepKind::NewtonSolve { iterations } => Some(*iterations),
                _ => None,
            })
            .collect();

        assert!(!solves.is_empty());
        assert!(solves.iter().all(|&count| count < 100));
    }
}
