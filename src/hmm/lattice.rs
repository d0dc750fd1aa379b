/// Score tables for Viterbi decoding of one sentence.
///
/// All scores are natural-log probabilities; paths are scored by summation.
#[derive(Debug, Default)]
pub(crate) struct Lattice {
    /// The total number of distinct labels (L).
    pub num_labels: usize,

    /// The number of items (T) in the sentence.
    num_items: usize,

    /// The number of items the buffers can hold without reallocation.
    cap_items: usize,

    /**
     * State scores.
     *  This is a [T][L] matrix whose element [t][l] presents the emission
     *  score of the token at #t under label #l.
     */
    pub state: Vec<f64>,

    /**
     * Transition scores.
     *  This is a [L][L] matrix whose element [i][j] represents the score
     *  of moving from label #i to label #j.
     */
    pub trans: Vec<f64>,

    /// Scores of the transitions from the opening boundary into each label.
    pub start: Vec<f64>,

    /// Scores of the transitions from each label into the closing boundary.
    /// Empty when the closing transition is not scored.
    pub end: Vec<f64>,

    /**
     * Candidate mask.
     *  This is a [T][L] matrix whose element [t][l] tells whether label #l
     *  may be assigned at #t.
     */
    pub allowed: Vec<bool>,

    /**
     * Viterbi score matrix.
     *  This is a [T][L] matrix whose element [t][l] presents the best score
     *  of the paths starting at BOS and arriving at (t, l).
     */
    alpha_score: Vec<f64>,

    /**
     * Backward edges.
     *  This is a [T][L] matrix whose element [t][j] represents the label #i
     *  that yields the maximum score to arrive at (t, j).
     */
    backward_edge: Vec<usize>,
}

#[allow(non_snake_case)]
impl Lattice {
    pub fn new(L: usize) -> Self {
        Self {
            num_labels: L,
            trans: vec![0.0; L * L],
            start: vec![0.0; L],
            ..Default::default()
        }
    }

    pub fn set_num_items(&mut self, T: usize) {
        let L = self.num_labels;
        self.num_items = T;
        if self.cap_items < T {
            self.state.resize(T * L, 0.0);
            self.allowed.resize(T * L, true);
            self.alpha_score.resize(T * L, 0.0);
            self.backward_edge.resize(T * L, 0);
            self.cap_items = T;
        }
    }

    /// Clears the state scores and the candidate mask of the current items.
    pub fn reset_state(&mut self) {
        let n = self.num_items * self.num_labels;
        self.state[..n].fill(0.0);
        self.allowed[..n].fill(true);
    }

    /// Score of the best path arriving at (t, l) after [`Lattice::viterbi`].
    pub fn score_at(&self, t: usize, l: usize) -> f64 {
        self.alpha_score[self.num_labels * t + l]
    }

    /// Fills `labels` with the best label sequence and returns its score.
    ///
    /// Ties keep the label with the lowest id.
    pub fn viterbi(&mut self, labels: &mut [usize]) -> f64 {
        let T = self.num_items;
        let L = self.num_labels;
        if T == 0 {
            return 0.0;
        }

        /* Compute the scores at (0, *). */
        for j in 0..L {
            self.alpha_score[j] = if self.allowed[j] {
                self.start[j] + self.state[j]
            } else {
                f64::NEG_INFINITY
            };
        }

        /* Compute the scores at (t, *). */
        for t in 1..T {
            for j in 0..L {
                let cur = L * t + j;
                if !self.allowed[cur] {
                    self.alpha_score[cur] = f64::NEG_INFINITY;
                    continue;
                }
                let mut max_score = f64::NEG_INFINITY;
                let mut argmax = None;
                for i in 0..L {
                    let prev = L * (t - 1) + i;
                    if !self.allowed[prev] {
                        continue;
                    }
                    /* Transit from (t-1, i) to (t, j). */
                    let score = self.alpha_score[prev] + self.trans[L * i + j];
                    if argmax.is_none() || max_score < score {
                        max_score = score;
                        argmax = Some(i);
                    }
                }
                /* Backward link (#t, #j) -> (#t-1, #i). */
                self.backward_edge[cur] = argmax.unwrap_or_default();
                self.alpha_score[cur] = max_score + self.state[cur];
            }
        }

        /* Find the node (#T, #i) that reaches EOS with the maximum score. */
        let mut max_score = f64::NEG_INFINITY;
        let mut best = None;
        for i in 0..L {
            let last = L * (T - 1) + i;
            if !self.allowed[last] {
                continue;
            }
            let score = self.alpha_score[last] + self.end.get(i).copied().unwrap_or(0.0);
            if best.is_none() || max_score < score {
                max_score = score;
                best = Some(i);
            }
        }
        labels[T - 1] = best.unwrap_or_default();

        /* Tag labels by tracing the backward links. */
        for t in (0..T - 1).rev() {
            let i = labels[t + 1];
            labels[t] = self.backward_edge[L * (t + 1) + i];
        }
        max_score
    }
}
