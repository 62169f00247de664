/// Consumes the next token if its type matches one of the patterns.
macro_rules! expect_if {
    ($self:ident, $( $pattern:pat_param )|+ $( if $guard: expr )?) => {
        match $self.tokens.peek().ty {
            $( $pattern )|+ $( if $guard )? => {
                $self.tokens.advance();
                true
            },
            _ => false
        }
    }
}

macro_rules! peek {
    ($self:ident, $( $pattern:pat_param )|+ $( if $guard: expr )?) => {
        match $self.tokens.peek().ty {
            $( $pattern )|+ $( if $guard )? => true,
            _ => false
        }
    }
}
