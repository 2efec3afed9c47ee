//! Recurrent layer used by the LSTM classifiers.

use candle_core::{Module, Result, Tensor, D};
use candle_nn::{ops::sigmoid, Linear, VarBuilder};

/// Processing order of an [`Lstm`] over the time steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn suffix(&self) -> &'static str {
        match self {
            Direction::Forward => "",
            Direction::Backward => "_reverse",
        }
    }
}

/// Single-layer, single-direction LSTM.
///
/// Weight names follow the PyTorch layout (`weight_ih_l0`, `weight_hh_l0`,
/// `bias_ih_l0`, optional `bias_hh_l0`, with a `_reverse` suffix for the
/// backward direction). Gates are ordered input, forget, cell, output.
#[derive(Debug, Clone)]
pub struct Lstm {
    input_proj: Linear,
    recurrent_proj: Linear,
    hidden_size: usize,
    direction: Direction,
}

impl Lstm {
    pub fn load(
        in_dim: usize,
        hidden_size: usize,
        direction: Direction,
        vb: VarBuilder,
    ) -> Result<Self> {
        let suffix = direction.suffix();
        let gates = 4 * hidden_size;

        let w_ih = vb.get((gates, in_dim), &format!("weight_ih_l0{suffix}"))?;
        let w_hh = vb.get((gates, hidden_size), &format!("weight_hh_l0{suffix}"))?;
        let b_ih = vb.get(gates, &format!("bias_ih_l0{suffix}"))?;

        // Keras exports a single bias; PyTorch splits it in two.
        let b_hh_name = format!("bias_hh_l0{suffix}");
        let bias = if vb.contains_tensor(&b_hh_name) {
            (b_ih + vb.get(gates, &b_hh_name)?)?
        } else {
            b_ih
        };

        Ok(Self {
            input_proj: Linear::new(w_ih, Some(bias)),
            recurrent_proj: Linear::new(w_hh, None),
            hidden_size,
            direction,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Runs over `xs` (`[steps, in_dim]`) and returns the final hidden state
    /// (`[1, hidden_size]`). Zero steps leave the state at zero.
    pub fn last_hidden(&self, xs: &Tensor) -> Result<Tensor> {
        let (steps, _) = xs.dims2()?;
        let mut h = Tensor::zeros((1, self.hidden_size), xs.dtype(), xs.device())?;
        let mut c = h.clone();
        if steps == 0 {
            return Ok(h);
        }

        // Input contribution for every step at once: [steps, 4H]
        let input_gates = self.input_proj.forward(xs)?;

        let order: Vec<usize> = match self.direction {
            Direction::Forward => (0..steps).collect(),
            Direction::Backward => (0..steps).rev().collect(),
        };

        for t in order {
            let gates = (input_gates.narrow(0, t, 1)? + self.recurrent_proj.forward(&h)?)?;
            let chunks = gates.chunk(4, D::Minus1)?;
            let i = sigmoid(&chunks[0])?;
            let f = sigmoid(&chunks[1])?;
            let g = chunks[2].tanh()?;
            let o = sigmoid(&chunks[3])?;

            c = ((f * &c)? + (i * g)?)?;
            h = (o * c.tanh()?)?;
        }

        Ok(h)
    }
}
