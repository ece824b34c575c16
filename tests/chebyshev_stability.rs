#[cfg(test)]
mod tests {
    use izhikevich_solvers::analysis::summarize;
    use izhikevich_solvers::model::{InputCurrent, IzhikevichParameters};
    use izhikevich_solvers::solver::{chebyshev, chebyshev::ChebyshevSettings, StepKind};

    // the stabilized variant of the reference runs with a smaller
    // after spike increment
    fn rkc_params() -> IzhikevichParameters {
        IzhikevichParameters { d: 20., ..Default::default() }
    }

    #[test]
    fn test_stage_counts_are_recorded() {
        let params = rkc_params();
        let trajectory = chebyshev::integrate(
            &params,
            &InputCurrent::Constant(100.),
            params.resting_state(),
            0.25,
            20.,
            &ChebyshevSettings::default(),
        );

        assert_eq!(trajectory.len(), 81);
        assert_eq!(trajectory.steps[0], StepKind::Initial);

        for kind in trajectory.steps.iter().skip(1) {
            match kind {
                StepKind::ChebyshevStages { stages } => assert_eq!(*stages, 4),
                StepKind::SpikeReset => {},
                other => panic!("unexpected step kind {:?}", other),
            }
        }
    }

    #[test]
    fn test_configurable_stage_count() {
        let params = rkc_params();
        let settings = ChebyshevSettings { stages: 6, damping: 1.0 };

        let trajectory = chebyshev::integrate(
            &params,
            &InputCurrent::Constant(100.),
            params.resting_state(),
            0.25,
            20.,
            &settings,
        );

        assert!(trajectory
            .steps
            .iter()
            .any(|&kind| kind == StepKind::ChebyshevStages { stages: 6 }));
    }

    #[test]
    fn test_trajectory_stays_finite_and_spikes() {
        let params = rkc_params();
        let trajectory = chebyshev::integrate(
            &params,
            &InputCurrent::Constant(100.),
            params.resting_state(),
            0.25,
            20.,
            &ChebyshevSettings::default(),
        );

        assert!(trajectory.voltages.iter().all(|v| v.is_finite()));
        assert!(trajectory.recovery.iter().all(|w| w.is_finite()));

        // no equilibrium exists under a 100 pA sustained current so the
        // voltage must cross the cutoff
        let summary = summarize(&trajectory, &params);
        assert!(summary.spike_count >= 1);
        assert!(summary.min_v < summary.max_v);
    }

    #[test]
    fn test_spike_reset_uses_configured_increment() {
        let params = rkc_params();
        let trajectory = chebyshev::integrate(
            &params,
            &InputCurrent::Constant(100.),
            params.resting_state(),
            0.25,
            20.,
            &ChebyshevSettings::default(),
        );

        let reset_index = trajectory
            .steps
            .iter()
            .position(|&kind| kind == StepKind::SpikeReset)
            .expect("run must spike");

        assert_eq!(trajectory.voltages[reset_index - 1], params.v_peak);
        assert_eq!(trajectory.voltages[reset_index], params.c);
        assert_eq!(
            trajectory.recovery[reset_index],
            trajectory.recovery[reset_index - 1] + params.d,
        );
    }

    #[test]
    fn test_chebyshev_is_bit_reproducible() {
        let params = rkc_params();
        let run = || {
            chebyshev::integrate(
                &params,
                &InputCurrent::Constant(100.),
                params.resting_state(),
                0.25,
                20.,
                &ChebyshevSettings::default(),
            )
        };

        assert_eq!(run(), run());
    }
}
