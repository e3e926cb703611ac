use ndarray::{Array1, Array2, Axis, concatenate};

/// Represents an individual's decision variables.
/// Each `IndividualGenes` is an `Array1<f64>`.
pub type IndividualGenes = Array1<f64>;

/// Represents an individual with genes, fitness, an optional normalized
/// fitness vector and an optional dominance rank.
pub struct Individual {
    pub genes: IndividualGenes,
    pub fitness: Array1<f64>,
    pub normalized_fitness: Option<Array1<f64>>,
    pub rank: Option<usize>,
}

impl Individual {
    pub fn new(
        genes: IndividualGenes,
        fitness: Array1<f64>,
        normalized_fitness: Option<Array1<f64>>,
        rank: Option<usize>,
    ) -> Self {
        Self {
            genes,
            fitness,
            normalized_fitness,
            rank,
        }
    }
}

/// Type aliases to work with populations.
pub type PopulationGenes = Array2<f64>;
pub type PopulationFitness = Array2<f64>;

/// The `Population` struct contains genes, fitness, an optional dominance
/// rank annotation and an optional normalized-fitness matrix.
///
/// Rank and normalized fitness are per-generation annotations: they are
/// populated by the selection pass and consumed read-only afterwards.
#[derive(Debug)]
pub struct Population {
    pub genes: PopulationGenes,
    pub fitness: PopulationFitness,
    pub rank: Option<Array1<usize>>,
    pub normalized_fitness: Option<Array2<f64>>,
}

impl Clone for Population {
    fn clone(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            fitness: self.fitness.clone(),
            rank: self.rank.clone(),
            normalized_fitness: self.normalized_fitness.clone(),
        }
    }
}

impl Population {
    /// Creates a new `Population` instance with the given genes, fitness and rank.
    /// The `normalized_fitness` field is set to `None` by default.
    pub fn new(
        genes: PopulationGenes,
        fitness: PopulationFitness,
        rank: Option<Array1<usize>>,
    ) -> Self {
        Self {
            genes,
            fitness,
            rank,
            normalized_fitness: None,
        }
    }

    /// Retrieves an `Individual` from the population by index.
    pub fn get(&self, idx: usize) -> Individual {
        let normalized_fitness = self
            .normalized_fitness
            .as_ref()
            .map(|nf| nf.row(idx).to_owned());
        let rank = self.rank.as_ref().map(|r| r[idx]);
        Individual::new(
            self.genes.row(idx).to_owned(),
            self.fitness.row(idx).to_owned(),
            normalized_fitness,
            rank,
        )
    }

    /// Returns a new `Population` containing only the individuals at the specified indices.
    pub fn selected(&self, indices: &[usize]) -> Population {
        let genes = self.genes.select(Axis(0), indices);
        let fitness = self.fitness.select(Axis(0), indices);
        let rank = self.rank.as_ref().map(|r| r.select(Axis(0), indices));
        let normalized_fitness = self
            .normalized_fitness
            .as_ref()
            .map(|nf| nf.select(Axis(0), indices));

        let mut selected_population = Population::new(genes, fitness, rank);
        if let Some(nf) = normalized_fitness {
            selected_population
                .set_normalized_fitness(nf)
                .expect("Failed to set normalized fitness");
        }
        selected_population
    }

    /// Returns the number of individuals in the population.
    pub fn len(&self) -> usize {
        self.genes.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a new `Population` containing only the individuals with rank = 0.
    /// If no ranking information is available, the entire population is returned.
    pub fn best(&self) -> Population {
        if let Some(ranks) = &self.rank {
            let indices: Vec<usize> = ranks
                .iter()
                .enumerate()
                .filter_map(|(i, &r)| if r == 0 { Some(i) } else { None })
                .collect();
            self.selected(&indices)
        } else {
            self.clone()
        }
    }

    /// Updates the population's `normalized_fitness` matrix.
    ///
    /// Validates that the provided matrix has one row per individual; returns
    /// an error otherwise.
    pub fn set_normalized_fitness(&mut self, normalized: Array2<f64>) -> Result<(), String> {
        if normalized.nrows() != self.len() {
            return Err(format!(
                "The normalized fitness matrix has {} rows but the population contains {} individuals.",
                normalized.nrows(),
                self.len()
            ));
        }
        self.normalized_fitness = Some(normalized);
        Ok(())
    }

    /// Merges two populations into one.
    pub fn merge(population1: &Population, population2: &Population) -> Population {
        let merged_genes = concatenate(
            Axis(0),
            &[population1.genes.view(), population2.genes.view()],
        )
        .expect("Failed to merge genes");

        let merged_fitness = concatenate(
            Axis(0),
            &[population1.fitness.view(), population2.fitness.view()],
        )
        .expect("Failed to merge fitness");

        // Merge rank: both must be Some or both must be None.
        let merged_rank = match (&population1.rank, &population2.rank) {
            (Some(r1), Some(r2)) => {
                Some(concatenate(Axis(0), &[r1.view(), r2.view()]).expect("Failed to merge rank"))
            }
            (None, None) => None,
            _ => panic!("Mismatched population rank: one is set and the other is None"),
        };

        // Merge normalized fitness: both must be Some or both must be None.
        let merged_normalized = match (
            &population1.normalized_fitness,
            &population2.normalized_fitness,
        ) {
            (Some(n1), Some(n2)) => Some(
                concatenate(Axis(0), &[n1.view(), n2.view()])
                    .expect("Failed to merge normalized fitness"),
            ),
            (None, None) => None,
            _ => {
                panic!("Mismatched population normalized fitness: one is set and the other is None")
            }
        };

        let mut merged_population = Population::new(merged_genes, merged_fitness, merged_rank);
        if let Some(nf) = merged_normalized {
            merged_population
                .set_normalized_fitness(nf)
                .expect("Failed to set normalized fitness");
        }
        merged_population
    }
}

/// Type alias for a vector of `Population` representing multiple fronts.
pub type Fronts = Vec<Population>;

/// An extension trait for `Fronts` that adds a `.to_population()` method
/// which flattens multiple fronts into a single `Population`.
pub trait FrontsExt {
    fn to_population(self) -> Population;
}

impl FrontsExt for Vec<Population> {
    fn to_population(self) -> Population {
        self.into_iter()
            .reduce(|pop1, pop2| Population::merge(&pop1, &pop2))
            .expect("Error when merging population vector")
    }
}
