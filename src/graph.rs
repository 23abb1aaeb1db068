//! Target graph: validation, ordering and execution.
//!
//! `depends_on` edges decide which targets are part of a run, `runs_before`
//! edges only constrain the order of targets that are already scheduled. Both
//! kinds feed one partial order. Its transitive closure is computed when the
//! graph is built, and each plan sorts just its own targets against it.

use {
    crate::{
        error::{GraphError, RunError},
        types::{BuildContext, Config, Target},
        utils::process::CommandRunner,
    },
    log::{debug, info},
    std::{
        collections::{BTreeSet, HashMap},
        time::Instant,
    },
};

#[derive(Debug)]
pub struct TargetGraph {
    targets: Vec<Target>,
    /// reachable[a] holds every target that must run after a, directly or not.
    reachable: Vec<BTreeSet<usize>>,
}

impl TargetGraph {
    pub fn new(targets: Vec<Target>) -> Result<Self, GraphError> {
        let mut index = HashMap::new();
        for (i, target) in targets.iter().enumerate() {
            if index.insert(target.name.to_lowercase(), i).is_some() {
                return Err(GraphError::DuplicateTarget(target.name.to_string()));
            }
        }

        // successors[a] holds every b that must run after a
        let mut successors = vec![BTreeSet::new(); targets.len()];
        for (i, target) in targets.iter().enumerate() {
            let resolve = |reference: &str| {
                index
                    .get(&reference.to_lowercase())
                    .copied()
                    .ok_or_else(|| GraphError::UnknownDependency {
                        target: target.name.to_string(),
                        reference: reference.to_string(),
                    })
            };
            for &dependency in &target.depends_on {
                successors[resolve(dependency)?].insert(i);
            }
            for &later in &target.runs_before {
                successors[i].insert(resolve(later)?);
            }
        }

        let order = sort_topologically(&successors).map_err(|stuck| {
            GraphError::Cycle(stuck.iter().map(|&i| targets[i].name.to_string()).collect())
        })?;
        debug!(
            "target order: {}",
            order
                .iter()
                .map(|&i| targets[i].name)
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        let mut reachable = vec![BTreeSet::new(); targets.len()];
        for &i in order.iter().rev() {
            let mut after = BTreeSet::new();
            for &later in &successors[i] {
                after.insert(later);
                after.extend(reachable[later].iter().copied());
            }
            reachable[i] = after;
        }

        Ok(Self { targets, reachable })
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.targets
            .iter()
            .position(|target| target.name.eq_ignore_ascii_case(name))
    }

    /// Targets needed for `requested`, in execution order, minus `skip`.
    pub fn plan<S: AsRef<str>>(
        &self,
        requested: &[S],
        skip: &[S],
    ) -> Result<ExecutionPlan<'_>, RunError> {
        let lookup = |name: &S| {
            self.position(name.as_ref())
                .ok_or_else(|| RunError::UnknownTarget(name.as_ref().to_string()))
        };
        let requested = requested
            .iter()
            .map(&lookup)
            .collect::<Result<Vec<_>, _>>()?;
        let skip = skip.iter().map(&lookup).collect::<Result<BTreeSet<_>, _>>()?;

        let mut in_closure = vec![false; self.targets.len()];
        let mut pending = requested;
        while let Some(i) = pending.pop() {
            if in_closure[i] {
                continue;
            }
            in_closure[i] = true;
            for dependency in &self.targets[i].depends_on {
                if let Some(d) = self.position(dependency) {
                    pending.push(d);
                }
            }
        }

        // declaration order, so ties in the sort below keep it
        let scheduled = (0..self.targets.len())
            .filter(|i| in_closure[*i] && !skip.contains(i))
            .collect::<Vec<_>>();
        let successors = scheduled
            .iter()
            .map(|&i| {
                scheduled
                    .iter()
                    .enumerate()
                    .filter(|(_, j)| self.reachable[i].contains(*j))
                    .map(|(k, _)| k)
                    .collect::<BTreeSet<_>>()
            })
            .collect::<Vec<_>>();
        // a subset of an acyclic order's transitive closure cannot have a cycle
        let order = sort_topologically(&successors)
            .unwrap_or_else(|_| (0..scheduled.len()).collect());

        let targets = order
            .into_iter()
            .map(|k| &self.targets[scheduled[k]])
            .collect();
        Ok(ExecutionPlan { targets })
    }

    /// Plans and executes `requested` in one go.
    pub fn run<S: AsRef<str>>(
        &self,
        requested: &[S],
        context: &BuildContext,
        runner: &dyn CommandRunner,
    ) -> Result<(), RunError> {
        self.plan(requested, &[])?.execute(context, runner)
    }
}

/// Kahn's algorithm, always taking the lowest ready index next.
///
/// On a cycle, returns the indices that could not be ordered.
fn sort_topologically(successors: &[BTreeSet<usize>]) -> Result<Vec<usize>, Vec<usize>> {
    let mut in_degree = vec![0usize; successors.len()];
    for later in successors.iter().flatten() {
        in_degree[*later] = in_degree[*later].saturating_add(1);
    }

    let mut ready = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| i)
        .collect::<BTreeSet<_>>();
    let mut order = Vec::with_capacity(successors.len());
    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &later in &successors[i] {
            in_degree[later] = in_degree[later].saturating_sub(1);
            if in_degree[later] == 0 {
                ready.insert(later);
            }
        }
    }

    if order.len() == successors.len() {
        Ok(order)
    } else {
        Err((0..successors.len()).filter(|i| in_degree[*i] > 0).collect())
    }
}

#[derive(Debug)]
pub struct ExecutionPlan<'a> {
    targets: Vec<&'a Target>,
}

impl ExecutionPlan<'_> {
    pub fn names(&self) -> Vec<&'static str> {
        self.targets.iter().map(|target| target.name).collect()
    }

    pub fn check_parameters(&self, config: &Config) -> Result<(), RunError> {
        for target in &self.targets {
            for parameter in &target.required_parameters {
                if config.parameter(parameter).is_none() {
                    return Err(RunError::MissingParameter {
                        target: target.name.to_string(),
                        parameter: parameter.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Runs every planned target in order, once the parameters of all of
    /// them have been checked.
    pub fn execute(
        &self,
        context: &BuildContext,
        runner: &dyn CommandRunner,
    ) -> Result<(), RunError> {
        self.check_parameters(&context.config)?;

        let mut timings = vec![];
        for target in &self.targets {
            info!("==> {}", target.name);
            let start = Instant::now();
            (target.action)(context, runner).map_err(|source| RunError::TargetFailed {
                target: target.name.to_string(),
                source,
            })?;
            timings.push((target.name, start.elapsed()));
        }

        for (name, elapsed) in timings {
            info!("  {name:<10} {:>8.2?}", elapsed);
        }
        Ok(())
    }
}
