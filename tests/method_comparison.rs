#[cfg(test)]
mod tests {
    use izhikevich_solvers::analysis::{
        dominant_frequency, run_method_suite, summarize, trajectory_power_density,
        Method, ReferenceCheckpoints,
    };
    use izhikevich_solvers::error::AnalysisError;
    use izhikevich_solvers::model::{InputCurrent, IzhikevichParameters};
    use izhikevich_solvers::solver::fixed_step::{self, FixedStepConfig};

    fn step_up_input() -> InputCurrent {
        InputCurrent::Step { onset: 101., amplitude: 70. }
    }

    #[test]
    fn test_suite_runs_all_methods_in_order() {
        let params = IzhikevichParameters::default();
        let config = FixedStepConfig { step_size: 0.5, total_time: 200. };
        let methods = [
            Method::ExplicitEuler,
            Method::Heun,
            Method::Midpoint,
            Method::BackwardEuler,
            Method::RungeKuttaChebyshev,
        ];

        let results = run_method_suite(
            &params,
            &step_up_input(),
            params.resting_state(),
            &config,
            &methods,
        );

        assert_eq!(results.len(), methods.len());
        for ((method, trajectory), expected) in results.iter().zip(methods.iter()) {
            assert_eq!(method, expected);
            assert_eq!(trajectory.len(), 401);
        }
    }

    #[test]
    fn test_parallel_suite_matches_direct_calls() {
        let params = IzhikevichParameters::default();
        let config = FixedStepConfig::default();

        let results = run_method_suite(
            &params,
            &step_up_input(),
            params.resting_state(),
            &config,
            &[Method::ExplicitEuler],
        );

        let direct = fixed_step::euler(&params, &step_up_input(), params.resting_state(), &config);

        assert_eq!(results[0].1, direct);
    }

    #[test]
    fn test_summary_counts_clipped_peaks() {
        let params = IzhikevichParameters::default();
        let trajectory = fixed_step::euler(
            &params,
            &step_up_input(),
            params.resting_state(),
            &FixedStepConfig::default(),
        );

        let summary = summarize(&trajectory, &params);

        assert!(summary.spike_count >= 1);
        assert_eq!(summary.max_v, params.v_peak);
        // the voltage never dips below the resting potential it started at
        assert!(summary.min_v <= params.v_rest);
    }

    #[test]
    fn test_out_of_range_checkpoint_is_a_soft_diagnostic() {
        let params = IzhikevichParameters::default();
        let short_run = fixed_step::euler(
            &params,
            &step_up_input(),
            params.resting_state(),
            &FixedStepConfig { step_size: 1., total_time: 100. },
        );

        let comparisons = ReferenceCheckpoints::default().compare(&short_run, 1.);

        assert!(!comparisons[0].is_out_of_range());
        assert!(comparisons[1].is_out_of_range());
        assert!(
            format!("{}", comparisons[1]).contains("time exceeds simulation duration"),
        );
    }

    #[test]
    fn test_checkpoint_series_lengths_must_match() {
        let result = ReferenceCheckpoints::new(
            vec![0., 250.],
            vec![-60.],
            vec![0., 6.2834],
        );

        assert!(matches!(result, Err(AnalysisError::CheckpointLengthMismatch)));
    }

    #[test]
    fn test_power_density_of_a_spiking_trace() {
        let params = IzhikevichParameters::default();
        let trajectory = fixed_step::euler(
            &params,
            &step_up_input(),
            params.resting_state(),
            &FixedStepConfig::default(),
        );

        let (frequencies, spectrum) = trajectory_power_density(&trajectory.voltages, 1., 1000.);

        assert_eq!(spectrum.len(), trajectory.len() / 2);
        assert!(spectrum.iter().all(|power| power.is_finite() && *power >= 0.));

        let dominant = dominant_frequency(&frequencies, &spectrum)
            .expect("spectrum must not be empty");
        assert!(dominant >= 0.);
        assert!(dominant < 0.5);
    }
}
