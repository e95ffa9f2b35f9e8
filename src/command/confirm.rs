use std::io::{self, BufRead, Write};

/// Blocking yes/no prompt. `y` accepts, `n` or end of input aborts, anything else asks again.
pub fn confirm<R, W>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(output, "{prompt} (y or n) ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        match line.trim() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}
